#[cfg(test)]
mod integration_tests {
    use crate::schemas::HealthResponse;
    use crate::test_utils::test_utils::{setup_test_app, TestApp, TESTUSER2_PASSWORD, TESTUSER_PASSWORD};
    use axum::http::{header, HeaderValue, StatusCode};
    use model::entities::{follows, message, user};
    use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set};

    async fn user_count(app: &TestApp) -> u64 {
        user::Entity::find().count(&app.db).await.unwrap()
    }

    async fn message_count(app: &TestApp) -> u64 {
        message::Entity::find().count(&app.db).await.unwrap()
    }

    async fn insert_message(app: &TestApp, author: &user::Model, text: &str) -> message::Model {
        message::ActiveModel {
            text: Set(text.to_string()),
            user_id: Set(author.id),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap()
    }

    async fn insert_follow(app: &TestApp, followed: &user::Model, follower: &user::Model) {
        follows::ActiveModel {
            user_being_followed_id: Set(followed.id),
            user_following_id: Set(follower.id),
        }
        .insert(&app.db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;

        let response = app.server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "connected");
    }

    #[tokio::test]
    async fn test_render_signup_form() {
        let app = setup_test_app().await;

        let response = app.server.get("/signup").await;
        let html = response.text();

        response.assert_status(StatusCode::OK);
        assert!(html.contains("Join Warbler today.</h2>"));
        assert!(html.contains("email"));
        assert!(html.contains("username"));
        assert!(html.contains("image_url"));
        assert!(html.contains("password"));
    }

    #[tokio::test]
    async fn test_register_user() {
        let app = setup_test_app().await;
        assert_eq!(user_count(&app).await, 2);

        let response = app
            .server
            .post("/signup")
            .form(&[("username", "testuser3"), ("email", "test3@test.com"), ("password", "testuser3pass")])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/");
        assert_eq!(user_count(&app).await, 3);

        // The new user is logged in
        let home = app.follow(&response).await;
        assert!(home.text().contains(r#"<aside class="col-md-4 col-lg-3 col-sm-12" id="home-aside">"#));
        assert!(home.text().contains("@testuser3"));
    }

    #[tokio::test]
    async fn test_no_duplicate_username() {
        let app = setup_test_app().await;
        assert_eq!(user_count(&app).await, 2);

        let response = app
            .server
            .post("/signup")
            .form(&[("username", "testuser"), ("email", "duplicate@duplicate.com"), ("password", "duplicate")])
            .await;
        let html = response.text();

        response.assert_status(StatusCode::OK);
        assert!(html.contains("Join Warbler today.</h2>"));
        assert!(html.contains("email"));
        assert!(html.contains("username"));
        assert!(html.contains("image_url"));
        assert!(html.contains("password"));
        assert!(html.contains("Username already taken"));
        assert_eq!(user_count(&app).await, 2);
    }

    #[tokio::test]
    async fn test_no_duplicate_email() {
        let app = setup_test_app().await;

        let response = app
            .server
            .post("/signup")
            .form(&[("username", "someone"), ("email", "test@test.com"), ("password", "password")])
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Email already taken"));
        assert_eq!(user_count(&app).await, 2);
    }

    #[tokio::test]
    async fn test_signup_invalid_form() {
        let app = setup_test_app().await;

        let response = app
            .server
            .post("/signup")
            .form(&[("username", "shorty"), ("email", "short@test.com"), ("password", "abc")])
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Password must be at least 6 characters."));
        assert_eq!(user_count(&app).await, 2);
    }

    #[tokio::test]
    async fn test_display_login_page() {
        let app = setup_test_app().await;

        let response = app.server.get("/login").await;
        let html = response.text();

        response.assert_status(StatusCode::OK);
        assert!(html.contains("Welcome back.</h2>"));
        assert!(html.contains("username"));
        assert!(html.contains("password"));
    }

    #[tokio::test]
    async fn test_login_user() {
        let app = setup_test_app().await;

        let response = app
            .server
            .post("/login")
            .form(&[("username", "testuser"), ("password", TESTUSER_PASSWORD)])
            .await;
        response.assert_status(StatusCode::FOUND);

        let response = app.follow(&response).await;
        let html = response.text();

        response.assert_status(StatusCode::OK);
        assert!(html.contains("Hello, testuser!"));
        assert!(html.contains(r#"<aside class="col-md-4 col-lg-3 col-sm-12" id="home-aside">"#));
    }

    #[tokio::test]
    async fn test_login_user_failed() {
        let app = setup_test_app().await;

        let response = app
            .server
            .post("/login")
            .form(&[("username", "testuser"), ("password", "testuserpass1")])
            .await;
        let html = response.text();

        response.assert_status(StatusCode::OK);
        assert!(html.contains("Invalid credentials."));
        assert!(html.contains("Welcome back.</h2>"));
        assert!(html.contains("username"));
        assert!(html.contains("password"));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let app = setup_test_app().await;

        let response = app
            .server
            .post("/login")
            .form(&[("username", "nobody"), ("password", "whatever")])
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Invalid credentials."));
    }

    #[tokio::test]
    async fn test_logout_user() {
        let app = setup_test_app().await;

        let response = app.server.get("/logout").await;
        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/login");

        let response = app.follow(&response).await;
        let html = response.text();

        response.assert_status(StatusCode::OK);
        assert!(html.contains("You have successfully logged out."));
        assert!(html.contains("Welcome back.</h2>"));
        assert!(html.contains("username"));
        assert!(html.contains("password"));
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = setup_test_app().await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let home = app.server.get("/").await;
        assert!(home.text().contains("home-aside"));

        app.server.get("/logout").await;

        let home = app.server.get("/").await;
        assert!(home.text().contains("<h4>New to Warbler?</h4>"));
        assert!(!home.text().contains("home-aside"));
    }

    #[tokio::test]
    async fn test_following_page_login() {
        let app = setup_test_app().await;
        insert_follow(&app, &app.testuser, &app.testuser2).await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app
            .server
            .get(&format!("/users/{}/following", app.testuser2.id))
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("<p>@testuser</p>"));
    }

    #[tokio::test]
    async fn test_following_page_no_login() {
        let app = setup_test_app().await;
        insert_follow(&app, &app.testuser, &app.testuser2).await;

        let response = app
            .server
            .get(&format!("/users/{}/following", app.testuser2.id))
            .await;
        response.assert_status(StatusCode::FOUND);

        let response = app.follow(&response).await;
        let html = response.text();

        response.assert_status(StatusCode::OK);
        assert!(!html.contains("<p>@testuser</p>"));
        assert!(html.contains("<h4>New to Warbler?</h4>"));
    }

    #[tokio::test]
    async fn test_followers_page_login() {
        let app = setup_test_app().await;
        insert_follow(&app, &app.testuser, &app.testuser2).await;
        app.login("testuser2", TESTUSER2_PASSWORD).await;

        let response = app
            .server
            .get(&format!("/users/{}/followers", app.testuser.id))
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("<p>@testuser2</p>"));
    }

    #[tokio::test]
    async fn test_follow_and_unfollow() {
        let app = setup_test_app().await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app
            .server
            .post(&format!("/users/follow/{}", app.testuser2.id))
            .await;
        response.assert_status(StatusCode::FOUND);
        assert_eq!(
            response.header("location"),
            format!("/users/{}/following", app.testuser.id).as_str()
        );
        assert!(app.testuser.is_following(&app.db, &app.testuser2).await.unwrap());
        assert!(app.testuser2.is_followed_by(&app.db, &app.testuser).await.unwrap());

        let page = app.follow(&response).await;
        assert!(page.text().contains("<p>@testuser2</p>"));

        let response = app
            .server
            .post(&format!("/users/stop-following/{}", app.testuser2.id))
            .await;
        response.assert_status(StatusCode::FOUND);
        assert!(!app.testuser.is_following(&app.db, &app.testuser2).await.unwrap());
    }

    #[tokio::test]
    async fn test_follow_unknown_user() {
        let app = setup_test_app().await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app.server.post("/users/follow/9999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_message() {
        let app = setup_test_app().await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app.server.post("/messages/new").form(&[("text", "Hello")]).await;

        response.assert_status(StatusCode::FOUND);
        let messages = message::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "Hello");
    }

    #[tokio::test]
    async fn test_add_message_no_login() {
        let app = setup_test_app().await;
        assert_eq!(message_count(&app).await, 0);

        let response = app.server.post("/messages/new").form(&[("text", "Hello")]).await;
        response.assert_status(StatusCode::FOUND);

        let response = app.follow(&response).await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("<h4>New to Warbler?</h4>"));
        assert_eq!(message_count(&app).await, 0);
    }

    #[tokio::test]
    async fn test_add_message_for_another_user() {
        let app = setup_test_app().await;
        app.login("testuser", TESTUSER_PASSWORD).await;
        let other_id = app.testuser2.id.to_string();

        let response = app
            .server
            .post("/messages/new")
            .form(&[("text", "Hello"), ("user_id", other_id.as_str())])
            .await;

        response.assert_status(StatusCode::FOUND);
        let messages = message::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "Hello");
        assert_eq!(messages[0].user_id, app.testuser.id);
    }

    #[tokio::test]
    async fn test_add_message_too_long() {
        let app = setup_test_app().await;
        app.login("testuser", TESTUSER_PASSWORD).await;
        let text = "x".repeat(141);

        let response = app.server.post("/messages/new").form(&[("text", text.as_str())]).await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Messages are 1 to 140 characters."));
        assert_eq!(message_count(&app).await, 0);
    }

    #[tokio::test]
    async fn test_show_message() {
        let app = setup_test_app().await;
        let msg = insert_message(&app, &app.testuser, "Squishy").await;

        let response = app.server.get(&format!("/messages/{}", msg.id)).await;
        let html = response.text();

        response.assert_status(StatusCode::OK);
        assert!(html.contains("Squishy"));
        assert!(html.contains("testuser"));
    }

    #[tokio::test]
    async fn test_show_unknown_message() {
        let app = setup_test_app().await;

        let response = app.server.get("/messages/9999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_message() {
        let app = setup_test_app().await;
        let msg = insert_message(&app, &app.testuser, "Please delete me").await;
        app.login("testuser", TESTUSER_PASSWORD).await;
        assert_eq!(message_count(&app).await, 1);

        let response = app.server.post(&format!("/messages/{}/delete", msg.id)).await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(message_count(&app).await, 0);
    }

    #[tokio::test]
    async fn test_delete_message_no_login() {
        let app = setup_test_app().await;
        let msg = insert_message(&app, &app.testuser, "Please delete me").await;

        let response = app.server.post(&format!("/messages/{}/delete", msg.id)).await;
        let response = app.follow(&response).await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("<h4>New to Warbler?</h4>"));
        assert_eq!(message_count(&app).await, 1);
    }

    #[tokio::test]
    async fn test_delete_message_for_another_user() {
        let app = setup_test_app().await;
        let msg = insert_message(&app, &app.testuser2, "Please delete me").await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app.server.post(&format!("/messages/{}/delete", msg.id)).await;
        let response = app.follow(&response).await;
        let html = response.text();

        assert_eq!(message_count(&app).await, 1);
        response.assert_status(StatusCode::OK);
        assert!(html.contains(r#"<aside class="col-md-4 col-lg-3 col-sm-12" id="home-aside">"#));
        assert!(html.contains("Access unauthorized."));
    }

    #[tokio::test]
    async fn test_home_feed_shows_followed_messages() {
        let app = setup_test_app().await;
        insert_message(&app, &app.testuser, "my own warble").await;
        insert_message(&app, &app.testuser2, "followed warble").await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let html = app.server.get("/").await.text();
        assert!(html.contains("my own warble"));
        assert!(!html.contains("followed warble"));

        insert_follow(&app, &app.testuser2, &app.testuser).await;
        let html = app.server.get("/").await.text();
        assert!(html.contains("followed warble"));
    }

    #[tokio::test]
    async fn test_toggle_like() {
        let app = setup_test_app().await;
        let msg = insert_message(&app, &app.testuser2, "likeable").await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app.server.post(&format!("/users/add_like/{}", msg.id)).await;
        response.assert_status(StatusCode::FOUND);
        assert_eq!(app.testuser.liked_message_ids(&app.db).await.unwrap(), vec![msg.id]);

        let likes = app.server.get(&format!("/users/{}/likes", app.testuser.id)).await;
        likes.assert_status(StatusCode::OK);
        assert!(likes.text().contains("likeable"));

        app.server.post(&format!("/users/add_like/{}", msg.id)).await;
        assert!(app.testuser.liked_message_ids(&app.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cannot_like_own_message() {
        let app = setup_test_app().await;
        let msg = insert_message(&app, &app.testuser, "mine").await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app.server.post(&format!("/users/add_like/{}", msg.id)).await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert!(app.testuser.liked_message_ids(&app.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_and_search_users() {
        let app = setup_test_app().await;

        let response = app.server.get("/users").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("<p>@testuser</p>"));
        assert!(response.text().contains("<p>@testuser2</p>"));

        let response = app.server.get("/users?q=user2").await;
        assert!(!response.text().contains("<p>@testuser</p>"));
        assert!(response.text().contains("<p>@testuser2</p>"));

        let response = app.server.get("/users?q=nobody").await;
        assert!(response.text().contains("Sorry, no users found"));
    }

    #[tokio::test]
    async fn test_show_user_profile() {
        let app = setup_test_app().await;
        insert_message(&app, &app.testuser, "profile warble").await;

        let response = app.server.get(&format!("/users/{}", app.testuser.id)).await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("@testuser"));
        assert!(response.text().contains("profile warble"));

        app.server.get("/users/9999").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_edit_profile() {
        let app = setup_test_app().await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app
            .server
            .post("/users/profile")
            .form(&[
                ("username", "renamed"),
                ("email", "test@test.com"),
                ("bio", "Hello there"),
                ("password", "wrong-password"),
            ])
            .await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Wrong password, please try again."));

        let response = app
            .server
            .post("/users/profile")
            .form(&[
                ("username", "renamed"),
                ("email", "test@test.com"),
                ("bio", "Hello there"),
                ("password", TESTUSER_PASSWORD),
            ])
            .await;
        response.assert_status(StatusCode::FOUND);

        let updated = user::Entity::find_by_id(app.testuser.id).one(&app.db).await.unwrap().unwrap();
        assert_eq!(updated.username, "renamed");
        assert_eq!(updated.bio.as_deref(), Some("Hello there"));
        assert_eq!(updated.image_url, user::DEFAULT_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_edit_profile_taken_username() {
        let app = setup_test_app().await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app
            .server
            .post("/users/profile")
            .form(&[("username", "testuser2"), ("email", "test@test.com"), ("password", TESTUSER_PASSWORD)])
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Username already taken"));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let app = setup_test_app().await;
        insert_message(&app, &app.testuser, "gone soon").await;
        insert_follow(&app, &app.testuser2, &app.testuser).await;
        app.login("testuser", TESTUSER_PASSWORD).await;

        let response = app.server.post("/users/delete").await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/signup");
        assert_eq!(user_count(&app).await, 1);
        assert_eq!(message_count(&app).await, 0);
        assert_eq!(follows::Entity::find().count(&app.db).await.unwrap(), 0);

        let home = app.server.get("/").await;
        assert!(home.text().contains("<h4>New to Warbler?</h4>"));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_user_logged_in() {
        let app = setup_test_app().await;
        app.login("testuser", TESTUSER_PASSWORD).await;
        app.db
            .execute_unprepared(
                "CREATE TRIGGER keep_users BEFORE DELETE ON users \
                 BEGIN SELECT RAISE(ABORT, 'users are kept'); END",
            )
            .await
            .unwrap();

        let response = app.server.post("/users/delete").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(user_count(&app).await, 2);
        let home = app.server.get("/").await;
        assert!(home.text().contains("home-aside"));
    }

    #[tokio::test]
    async fn test_login_ignores_client_chosen_session_id() {
        let app = setup_test_app().await;
        let planted = HeaderValue::from_static("warbler_session=chosen-by-client");

        let response = app
            .server
            .post("/login")
            .clear_cookies()
            .add_header(header::COOKIE, planted.clone())
            .form(&[("username", "testuser"), ("password", TESTUSER_PASSWORD)])
            .await;
        response.assert_status(StatusCode::FOUND);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login must issue a session cookie")
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("warbler_session="));
        assert!(!set_cookie.contains("chosen-by-client"));

        // The planted id does not carry the login
        let home = app
            .server
            .get("/")
            .clear_cookies()
            .add_header(header::COOKIE, planted)
            .await;
        assert!(!home.text().contains("home-aside"));
        assert!(home.text().contains("<h4>New to Warbler?</h4>"));
    }

    #[tokio::test]
    async fn test_login_renews_existing_session_cookie() {
        let app = setup_test_app().await;

        let before = app.server.get("/login").await;
        let first = before.cookie("warbler_session");

        let response = app
            .server
            .post("/login")
            .form(&[("username", "testuser"), ("password", TESTUSER_PASSWORD)])
            .await;
        let second = response.cookie("warbler_session");

        assert_ne!(first.value(), second.value());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = setup_test_app().await;

        let response = app.server.get("/no/such/page").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
