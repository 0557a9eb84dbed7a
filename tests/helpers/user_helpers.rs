use axum_test::TestServer;
use bronze_server::{entities::user::UserRole, models::view::user::{AuthView, UserView}};
use fake::{faker, Fake};
use serde_json::json;

pub const PASSWORD: &str = "some3242paSs#$";

pub struct TestUser {
    pub user: UserView,
    pub token: String,
}

impl TestUser {
    pub fn cookie(&self) -> String {
        format!("jwt={}", self.token)
    }
}

pub fn fake_username() -> String {
    let word: String = faker::lorem::en::Word().fake();
    let digits: u32 = (10000..99999).fake();
    format!("{word}_{digits}")
}

pub async fn create_fake_login_test_user(server: &TestServer, role: UserRole) -> TestUser {
    let response = server
        .post("/api/register")
        .json(&json!({
            "username": fake_username(),
            "password": PASSWORD,
            "full_name": faker::name::en::Name().fake::<String>(),
            "email": faker::internet::en::SafeEmail().fake::<String>(),
            "role": role,
        }))
        .add_header("Accept", "application/json")
        .await;
    response.assert_status_success();
    let auth = super::data::<AuthView>(&response);
    TestUser {
        user: auth.user,
        token: auth.token,
    }
}

pub async fn get_current_user(server: &TestServer, user: &TestUser) -> UserView {
    let response = server
        .get("/api/users/current")
        .add_header("Cookie", user.cookie())
        .await;
    response.assert_status_success();
    super::data::<UserView>(&response)
}
