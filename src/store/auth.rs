use serde::{Deserialize, Serialize};

/// Authentication slice. `is_authenticated` is always the presence of
/// `token`; every reducer arm recomputes it rather than trusting the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone)]
pub enum AuthAction {
    /// Successful login or signup; always moves to the authenticated state.
    LoginSuccess {
        token: String,
        profile_picture: Option<String>,
    },
    /// Clear the session.
    Logout,
    /// Rehydrate from durable storage at startup. `None` forces the
    /// anonymous state even if the slice was somehow authenticated.
    SetTokenFromStorage {
        token: Option<String>,
        profile_picture: Option<String>,
    },
}

/// Pure reducer for the auth slice.
pub fn reduce(_state: &AuthState, action: &AuthAction) -> AuthState {
    let next = match action {
        AuthAction::LoginSuccess {
            token,
            profile_picture,
        } => AuthState {
            token: Some(token.clone()),
            is_authenticated: true,
            profile_picture: profile_picture.clone(),
        },
        AuthAction::Logout => AuthState::default(),
        AuthAction::SetTokenFromStorage {
            token,
            profile_picture,
        } => AuthState {
            is_authenticated: token.is_some(),
            token: token.clone(),
            profile_picture: if token.is_some() {
                profile_picture.clone()
            } else {
                None
            },
        },
    };
    debug_assert_eq!(next.is_authenticated, next.token.is_some());
    next
}
