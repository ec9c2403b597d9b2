//! Integration tests per le liste controllate
//!
//! Test per:
//! - GET    /api/options
//! - GET    /api/operators
//! - POST   /api/options
//! - DELETE /api/options

mod common;

#[cfg(test)]
mod option_tests {
    use super::common::*;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options")))]
    async fn test_options_are_public_and_sorted(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/api/options").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["operators"],
            json!(["Ètienne Verdi", "LUCA BIANCHI", "MARIO ROSSI"])
        );
        assert_eq!(body["cantieri"], json!(["Bergamo Nord", "Milano Centro"]));
        assert_eq!(body["macchine"], json!(["Gru 40", "M1"]));
        assert_eq!(body["linee"], json!(["L1", "L2"]));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options")))]
    async fn test_operators_endpoint(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/api/operators").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["operators"].as_array().map(Vec::len), Some(3));
        Ok(())
    }

    #[sqlx::test]
    async fn test_options_empty_database(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/api/options").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body,
            json!({ "operators": [], "cantieri": [], "macchine": [], "linee": [] })
        );
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options")))]
    async fn test_add_option_is_case_insensitive_idempotent(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = admin_token(&server).await;

        let response = server
            .post("/api/options")
            .add_header(authorization(), bearer(&token))
            .json(&json!({ "category": "macchine", "value": "  Escavatore " }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["ok"], true);
        assert_eq!(body["created"], true);
        assert_eq!(body["options"]["macchine"], json!(["Escavatore", "Gru 40", "M1"]));

        let response = server
            .post("/api/options")
            .add_header(authorization(), bearer(&token))
            .json(&json!({ "category": "MACCHINE", "value": "escavatore" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["created"], false);
        assert_eq!(body["options"]["macchine"], json!(["Escavatore", "Gru 40", "M1"]));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options")))]
    async fn test_remove_option_twice(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = admin_token(&server).await;

        let response = server
            .delete("/api/options")
            .add_header(authorization(), bearer(&token))
            .json(&json!({ "category": "linee", "value": "l2" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["options"]["linee"], json!(["L1"]));

        let response = server
            .delete("/api/options")
            .add_header(authorization(), bearer(&token))
            .json(&json!({ "category": "linee", "value": "L2" }))
            .await;
        response.assert_status_not_found();
        let body: Value = response.json();
        assert!(body["error"].is_string());
        assert_eq!(body["options"]["linee"], json!(["L1"]));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options")))]
    async fn test_mutation_rejects_bad_input(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = admin_token(&server).await;

        for body in [
            json!({ "category": "veicoli", "value": "Furgone" }),
            json!({ "category": "linee", "value": "   " }),
            json!({}),
        ] {
            server
                .post("/api/options")
                .add_header(authorization(), bearer(&token))
                .json(&body)
                .await
                .assert_status_bad_request();
        }
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options")))]
    async fn test_mutation_requires_admin(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let user_token = register_operator(&server, "Mario", "Rossi").await;

        let response = server
            .post("/api/options")
            .json(&json!({ "category": "linee", "value": "L3" }))
            .await;
        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["error"], "Unauthorized");

        // un token utente non vale come token admin
        server
            .delete("/api/options")
            .add_header(authorization(), bearer(&user_token))
            .json(&json!({ "category": "linee", "value": "L1" }))
            .await
            .assert_status_unauthorized();

        let body: Value = server.get("/api/options").await.json();
        assert_eq!(body["linee"], json!(["L1", "L2"]));
        Ok(())
    }
}
