use serde::{Deserialize, Serialize};

/// Profile details for the signed-in user. Cached durably for 24 hours so
/// the profile view renders without a round trip.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    // The API calls this "picture" on some endpoints and "profilePhoto" on others
    #[serde(rename = "profilePhoto", alias = "picture", default)]
    pub profile_photo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_photo_field_names() {
        let a: UserProfile =
            serde_json::from_str(r#"{"name":"Asha","email":"a@b.in","picture":"p.png"}"#)
                .expect("parse picture alias");
        assert_eq!(a.profile_photo.as_deref(), Some("p.png"));

        let b: UserProfile =
            serde_json::from_str(r#"{"name":"Asha","email":"a@b.in","profilePhoto":"q.png"}"#)
                .expect("parse canonical name");
        assert_eq!(b.profile_photo.as_deref(), Some("q.png"));
    }
}
