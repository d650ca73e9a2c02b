// Account endpoints: login, registration, password reset, profile.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    LoginRequest, ProfileUpdate, Registration, RegistrationRequest, TokenResponse, UserProfile,
};

impl ApiClient {
    /// `POST /auth/login`. Returns the issued token; persisting it is the
    /// caller's decision.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<TokenResponse, Error> {
        let url = self.url("auth/login")?;
        debug!(email, "logging in");
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let builder = self.request(Method::POST, url)?.json(&body);
        self.send_json(builder).await
    }

    /// `POST /auth/register`. The created profile is returned when the
    /// server sends one.
    pub async fn register(&self, registration: &Registration) -> Result<Option<UserProfile>, Error> {
        let url = self.url("auth/register")?;
        let body = RegistrationRequest {
            name: &registration.name,
            email: &registration.email,
            password: registration.password.expose_secret(),
        };
        let builder = self.request(Method::POST, url)?.json(&body);
        let value: Value = self.send_json(builder).await.or_else(|e| match e {
            Error::Deserialization { .. } => Ok(Value::Null),
            other => Err(other),
        })?;
        Ok(serde_json::from_value(value).ok())
    }

    /// `POST /auth/reset-password?email=`.
    pub async fn reset_password(&self, email: &str) -> Result<(), Error> {
        let url = self.url("auth/reset-password")?;
        let builder = self.request(Method::POST, url)?.query(&[("email", email)]);
        self.send_empty(builder).await
    }

    /// `GET /auth/me`.
    pub async fn current_user(&self) -> Result<UserProfile, Error> {
        let url = self.url("auth/me")?;
        let builder = self.request(Method::GET, url)?;
        self.send_json(builder).await
    }

    /// `PUT /auth/me`. Returns the fields the server reports as updated.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Map<String, Value>, Error> {
        let url = self.url("auth/me")?;
        let builder = self.request(Method::PUT, url)?.json(update);
        let value: Value = self.send_json(builder).await?;
        match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(Error::Deserialization {
                message: "expected a JSON object from PUT /auth/me".into(),
                body: other.to_string(),
            }),
        }
    }
}
