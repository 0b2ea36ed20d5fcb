use serde_json::json;

use crate::support::{JWT_SECRET, TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::REGISTER,
                &json!({"email": "ada@example.com", "password": "securepass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["email"], "ada@example.com");
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_taken_email() {
        let app = TestApp::spawn().await;
        let body = json!({"email": "ada@example.com", "password": "securepass"});

        let first = app.post_json(routes::REGISTER, &body, None).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_json(routes::REGISTER, &body, None).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let app = TestApp::spawn().await;

        app.post_json(
            routes::REGISTER,
            &json!({"email": "ada@example.com", "password": "securepass"}),
            None,
        )
        .await;
        let res = app
            .post_json(
                routes::REGISTER,
                &json!({"email": "ADA@Example.com", "password": "securepass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::REGISTER,
                &json!({"email": "ada@example.com", "password": "short"}),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::REGISTER, &json!({"email": "ada@example.com"}), None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_receives_a_token() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("ada@example.com", "securepass")
            .await;

        let claims = atelier_server::utils::jwt::verify(&token, JWT_SECRET).unwrap();
        assert_eq!(claims.sub, "ada@example.com");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("ada@example.com", "securepass")
            .await;

        let res = app
            .post_json(
                routes::LOGIN,
                &json!({"email": "ada@example.com", "password": "wrongpass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_looks_like_a_wrong_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::LOGIN,
                &json!({"email": "nobody@example.com", "password": "securepass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod guard {
    use super::*;

    #[tokio::test]
    async fn me_returns_the_token_owner() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("ada@example.com", "securepass")
            .await;

        let res = app.get(routes::ME, Some(&token)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["email"], "ada@example.com");
        assert_eq!(res.body["id"], 1);
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ME, None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ME, Some("not-a-jwt")).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_authorization(routes::IMAGES, "Basic YWRhOnNlY3VyZXBhc3M=")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let app = TestApp::spawn().await;
        let token = atelier_server::utils::jwt::sign(1, "ada@example.com", JWT_SECRET, -2).unwrap();

        let res = app.get(routes::IMAGES, Some(&token)).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn token_without_subject_is_unauthorized() {
        let app = TestApp::spawn().await;
        let token = atelier_server::utils::jwt::sign(1, "", JWT_SECRET, 1).unwrap();

        let res = app.get(routes::IMAGES, Some(&token)).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "UNAUTHORIZED");
    }
}
