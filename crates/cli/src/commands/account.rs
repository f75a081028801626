//! Login, registration and logout against the storefront API.
//!
//! The token returned by login is kept in the state file and sent as a
//! bearer token; the client never looks inside it.

use reqwest::StatusCode;

use cartwheel_core::{LoginForm, RegistrationForm};

use super::{Shopper, ShopperError, notify};
use crate::client::ClientError;
use crate::state_file::StoredSession;

/// Log in and remember the token and role.
///
/// # Errors
///
/// Returns `ShopperError::Client` if the form is invalid or the server
/// rejects the credentials.
pub async fn login(email: String, password: String) -> Result<(), ShopperError> {
    let mut shopper = Shopper::open().await?;
    let form = LoginForm { email, password };

    let response = shopper.client.login(&form).await?;
    let user = response.user;

    shopper.state.session = Some(StoredSession {
        token: response.token,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
    });
    shopper.save().await?;

    tracing::debug!(user_id = %user.id, role = %user.role, "Logged in");
    notify(format_args!("Logged in as {} <{}>", user.name, user.email));
    if user.role.is_admin() {
        notify("Administrator account: manage the store with `cw user` and `cw seed`.");
    }
    Ok(())
}

/// Create an account. The new account still has to log in.
///
/// # Errors
///
/// Returns `ShopperError::Client` if the form is invalid or the email is taken.
pub async fn register(form: RegistrationForm) -> Result<(), ShopperError> {
    let shopper = Shopper::open().await?;
    let message = shopper.client.register(&form).await?;

    notify(message);
    notify("Log in with `cw login` to continue.");
    Ok(())
}

/// Revoke the stored token and forget it. The cart and wishlist stay.
///
/// # Errors
///
/// Returns `ShopperError::State` if the state file cannot be written.
pub async fn logout() -> Result<(), ShopperError> {
    let mut shopper = Shopper::open().await?;
    let Some(session) = shopper.state.session.take() else {
        notify("Not logged in");
        return Ok(());
    };

    // The local token is dropped even if the server cannot be told.
    if let Err(e) = shopper.client.logout(&session.token).await {
        tracing::warn!(error = %e, "Server-side logout failed");
    }
    shopper.save().await?;

    notify(format_args!("Logged out {}", session.email));
    Ok(())
}

/// Show the logged-in account, as the server sees it.
///
/// # Errors
///
/// Returns `ShopperError::NotLoggedIn` if no token is stored, or
/// `ShopperError::Client` if the server cannot be reached.
pub async fn whoami() -> Result<(), ShopperError> {
    let mut shopper = Shopper::open().await?;
    let Some(session) = shopper.state.session.as_ref() else {
        return Err(ShopperError::NotLoggedIn);
    };

    match shopper.client.me(&session.token).await {
        Ok(profile) => {
            notify(format_args!(
                "{} <{}> ({})",
                profile.name, profile.email, profile.role
            ));
            if profile.role.is_admin() {
                notify("Administrator view available.");
            }
            Ok(())
        }
        Err(ClientError::Server {
            status: StatusCode::UNAUTHORIZED,
            ..
        }) => {
            shopper.state.session = None;
            shopper.save().await?;
            Err(ShopperError::NotLoggedIn)
        }
        Err(e) => Err(e.into()),
    }
}
