use crate::client::HubClient;
use crate::error::Result;
use crate::models::{LoginRequest, SignupRequest, TokenResponse, User};

impl HubClient {
    /// Registers a new account. The API answers with the created user, not a token.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let payload = SignupRequest {
            name,
            email,
            password,
        };
        self.post("auth/signup", &payload).await
    }

    /// Exchanges credentials for an access token. The token is not installed on the client.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let payload = LoginRequest { email, password };
        self.post("auth/login", &payload).await
    }

    pub async fn me(&self) -> Result<User> {
        self.get("me").await
    }
}
