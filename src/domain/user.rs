/// A login identity for the store-backed credential variant.
///
/// `password` is compared as plaintext. There is no hashing anywhere in the
/// login path; see DESIGN.md before exposing this beyond a trusted network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}
