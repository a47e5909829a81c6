/// Input of `AccountService::update_account`.
///
/// `password` is only applied when present and non-empty, and only when it
/// matches `confirm_password`.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountDto {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}
