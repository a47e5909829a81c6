/// Input of `AccountService::create_account`.
#[derive(Debug, Clone, Default)]
pub struct CreateAccountDto {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub status: Option<String>,
}
