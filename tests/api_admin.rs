//! Integration tests per il pannello admin
//!
//! Test per:
//! - POST   /api/entries/search
//! - DELETE /api/entries/{entry_id}
//! - POST   /api/entries/delete-bulk

mod common;

#[cfg(test)]
mod admin_tests {
    use super::common::*;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    async fn search_ids(server: &TestServer, token: &str, filters: Value) -> Vec<i64> {
        let response = server
            .post("/api/entries/search")
            .add_header(authorization(), bearer(token))
            .json(&filters)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["entries"]
            .as_array()
            .expect("entries array")
            .iter()
            .filter_map(|e| e["id"].as_i64())
            .collect()
    }

    // ============================================================
    // Test per POST /api/entries/search
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options", "entries")))]
    async fn test_search_without_filters_orders_by_date(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = admin_token(&server).await;

        assert_eq!(search_ids(&server, &token, json!({})).await, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options", "entries")))]
    async fn test_search_text_filters(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = admin_token(&server).await;

        assert_eq!(search_ids(&server, &token, json!({ "operator": "rossi" })).await, vec![1, 3]);
        assert_eq!(search_ids(&server, &token, json!({ "cantiere": "NORD" })).await, vec![2, 3]);
        assert_eq!(search_ids(&server, &token, json!({ "cantiere": "milano centro" })).await, vec![1, 4]);
        assert!(search_ids(&server, &token, json!({ "macchina": "gru" })).await.is_empty());
        assert_eq!(search_ids(&server, &token, json!({ "macchina": "GRU 40" })).await, vec![2, 3]);
        assert_eq!(
            search_ids(&server, &token, json!({ "linea": "l1", "operator": "bianchi" })).await,
            vec![4]
        );
        assert_eq!(search_ids(&server, &token, json!({ "descrContains": "CAVI" })).await, vec![1]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options", "entries")))]
    async fn test_search_date_range(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = admin_token(&server).await;

        assert_eq!(search_ids(&server, &token, json!({ "dataFrom": "01/04/2025" })).await, vec![4]);
        assert_eq!(search_ids(&server, &token, json!({ "dataTo": "09/03/2025" })).await, vec![1, 2]);
        assert_eq!(
            search_ids(&server, &token, json!({ "dataFrom": "04/03/2025", "dataTo": "10/03/2025" })).await,
            vec![2, 3]
        );

        server
            .post("/api/entries/search")
            .add_header(authorization(), bearer(&token))
            .json(&json!({ "dataFrom": "2025-03-01" }))
            .await
            .assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options", "entries")))]
    async fn test_search_requires_admin(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        server
            .post("/api/entries/search")
            .json(&json!({}))
            .await
            .assert_status_unauthorized();

        server
            .post("/api/entries/search")
            .add_header(authorization(), bearer("forged"))
            .json(&json!({}))
            .await
            .assert_status_unauthorized();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options")))]
    async fn test_wrong_admin_credentials(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        server
            .post("/api/login")
            .json(&json!({ "user": ADMIN_USER, "pass": "wrong" }))
            .await
            .assert_status_unauthorized();
        Ok(())
    }

    // ============================================================
    // Cancellazione
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options", "entries")))]
    async fn test_delete_entry_then_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = admin_token(&server).await;

        let response = server
            .delete("/api/entries/4")
            .add_header(authorization(), bearer(&token))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body, json!({ "ok": true, "deleted": 1 }));

        server
            .delete("/api/entries/4")
            .add_header(authorization(), bearer(&token))
            .await
            .assert_status_not_found();

        assert_eq!(search_ids(&server, &token, json!({})).await, vec![1, 2, 3]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options", "entries")))]
    async fn test_bulk_delete_counts_existing_rows(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = admin_token(&server).await;

        let response = server
            .post("/api/entries/delete-bulk")
            .add_header(authorization(), bearer(&token))
            .json(&json!({ "ids": [1, 2, 99] }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["deleted"], 2);

        server
            .post("/api/entries/delete-bulk")
            .add_header(authorization(), bearer(&token))
            .json(&json!({ "ids": [] }))
            .await
            .assert_status_bad_request();

        assert_eq!(search_ids(&server, &token, json!({})).await, vec![3, 4]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("options")))]
    async fn test_operator_shift_shows_up_in_search(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let user = register_operator(&server, "Luca", "Bianchi").await;
        let admin = admin_token(&server).await;

        server
            .post("/api/entry")
            .add_header(authorization(), bearer(&user))
            .json(&json!({
                "operator": "LUCA BIANCHI",
                "cantiere": "Bergamo Nord",
                "macchina": "Gru 40",
                "linea": "L2",
                "ore": 3,
                "data": "02/05/2025",
            }))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/entries/search")
            .add_header(authorization(), bearer(&admin))
            .json(&json!({ "operator": "luca", "dataFrom": "01/05/2025" }))
            .await;
        let body: Value = response.json();
        let entries = body["entries"].as_array().expect("entries array");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["data_dmy"], "02/05/2025");
        assert_eq!(entries[0]["ore"], json!(3.0));
        Ok(())
    }
}
