use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::NaiveDate;
use linecook::api::create_router;
use linecook::models::*;
use linecook::store::DocumentStore;
use serde_json::{json, Value};

fn d(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn setup() -> TestServer {
    let app = create_router(DocumentStore::open_memory());
    TestServer::new(app).expect("Failed to create test server")
}

fn setup_with(tasks: Vec<Task>) -> TestServer {
    let app = create_router(DocumentStore::with_tasks(tasks));
    TestServer::new(app).expect("Failed to create test server")
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();

        let response = server.get("/api/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "ok": true }));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let server = setup();

        let response = server.get("/api/nothing-here").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Not found");
    }
}

mod document {
    use super::*;

    #[tokio::test]
    async fn returns_seeded_document() {
        let server = setup();

        let response = server.get("/api/doc").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["revision"], 0);
        assert!(body["updatedAt"].is_string());
        assert_eq!(body["doc"]["tasks"][1]["parentId"], "t1");
    }

    #[tokio::test]
    async fn put_with_current_revision_bumps_it() {
        let server = setup();

        let response = server
            .put("/api/doc")
            .json(&PutDocumentInput {
                base_revision: 0,
                doc: Document::new(vec![Task::new("only", "Only")]),
            })
            .await;

        response.assert_status_ok();
        let stored: StoredDocument = response.json();
        assert_eq!(stored.revision, 1);
        assert_eq!(stored.doc.tasks[0].id, "only");

        let fetched: StoredDocument = server.get("/api/doc").await.json();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn put_stores_the_document_verbatim() {
        let server = setup();
        let doc = json!({
            "tasks": [{
                "id": "a",
                "title": "A",
                "done": false,
                "collapsed": false,
                "parentId": null,
                "order": 0,
                "start": "2024-1-5",
                "end": "soon",
                "notes": "keep me",
            }],
            "theme": "dark",
        });

        server
            .put("/api/doc")
            .json(&json!({ "baseRevision": 0, "doc": doc }))
            .await
            .assert_status_ok();

        let fetched: Value = server.get("/api/doc").await.json();
        assert_eq!(fetched["doc"], doc);

        let effective: Value = server.get("/api/doc/effective").await.json();
        assert_eq!(effective["a"]["effectiveStart"], Value::Null);
        assert_eq!(effective["a"]["effectiveEnd"], Value::Null);
    }

    #[tokio::test]
    async fn put_with_stale_revision_conflicts() {
        let server = setup();
        server
            .put("/api/doc")
            .json(&json!({ "baseRevision": 0, "doc": { "tasks": [] } }))
            .await
            .assert_status_ok();

        let response = server
            .put("/api/doc")
            .json(&json!({ "baseRevision": 0, "doc": { "tasks": [] } }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["error"], "conflict");
        assert_eq!(body["current"]["revision"], 1);
    }

    #[tokio::test]
    async fn put_with_non_integer_revision_is_rejected() {
        let server = setup();

        let response = server
            .put("/api/doc")
            .json(&json!({ "baseRevision": "zero", "doc": { "tasks": [] } }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn put_with_malformed_json_is_rejected() {
        let server = setup();

        let response = server
            .put("/api/doc")
            .text("{ nope")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Invalid JSON");
    }
}

mod derived {
    use super::*;

    #[tokio::test]
    async fn effective_dates_roll_up() {
        let server = setup_with(vec![
            Task::new("p", "Parent").with_dates(d("2024-01-05"), None),
            Task::new("a", "A")
                .with_parent("p")
                .with_dates(d("2024-01-01"), d("2024-01-10")),
        ]);

        let response = server.get("/api/doc/effective").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["p"],
            json!({
                "effectiveStart": "2024-01-05",
                "effectiveEnd": "2024-01-10",
                "warnInvalid": false,
                "warnInconsistent": true,
            })
        );
        assert_eq!(body["a"]["warnInconsistent"], false);
    }

    #[tokio::test]
    async fn timeline_is_padded_to_weeks() {
        let server = setup_with(vec![
            Task::new("a", "A").with_dates(d("2024-01-10"), d("2024-01-16"))
        ]);

        let response = server.get("/api/doc/timeline").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["paddedStart"], "2024-01-07");
        assert_eq!(body["paddedEnd"], "2024-01-20");
        assert_eq!(body["days"].as_array().map(Vec::len), Some(14));
        assert_eq!(body["weeks"], json!(["2024-01-07", "2024-01-14"]));
    }

    #[tokio::test]
    async fn timeline_without_dates_is_empty() {
        let server = setup_with(vec![Task::new("a", "A")]);

        let response = server.get("/api/doc/timeline").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "empty": true }));
    }

    #[tokio::test]
    async fn outline_renders_as_text() {
        let server = setup();

        let response = server.get("/api/doc/outline").await;

        response.assert_status_ok();
        assert_eq!(
            response.text(),
            "○ Example task [2025-12-16 → 2025-12-19]\n└── ○ Subtask [2025-12-18]\n"
        );
    }
}

mod tasks {
    use super::*;

    #[tokio::test]
    async fn in_progress_excludes_done_tasks() {
        let mut finished = Task::new("done", "Done");
        finished.done = true;
        let server = setup_with(vec![Task::new("open", "Open"), finished]);

        let response = server.get("/api/tasks/inprogress").await;

        response.assert_status_ok();
        let tasks: Vec<Task> = response.json();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "open");
    }

    #[tokio::test]
    async fn create_appends_child() {
        let server = setup();

        let response = server
            .post("/api/tasks")
            .json(&CreateTaskInput {
                parent_id: Some("t1".to_string()),
                title: "Another".to_string(),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let created: TaskCreated = response.json();
        assert_eq!(created.document.revision, 1);
        let task = created
            .document
            .doc
            .tasks
            .iter()
            .find(|t| t.id == created.task_id)
            .expect("new task in document");
        assert_eq!(task.parent_id.as_deref(), Some("t1"));
        assert_eq!(task.order, 1);
    }

    #[tokio::test]
    async fn create_under_unknown_parent_is_rejected() {
        let server = setup();

        let response = server
            .post("/api/tasks")
            .json(&json!({ "parentId": "ghost", "title": "Lost" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(server.get("/api/doc").await.json::<Value>()["revision"], 0);
    }

    #[tokio::test]
    async fn delete_removes_subtree() {
        let server = setup();

        let response = server.delete("/api/tasks/t1").await;

        response.assert_status_ok();
        let stored: StoredDocument = response.json();
        assert_eq!(stored.doc.tasks.len(), 1);
        assert_ne!(stored.doc.tasks[0].id, "t1");
        assert_ne!(stored.doc.tasks[0].id, "t2");
    }

    #[tokio::test]
    async fn delete_unknown_task_is_not_found() {
        let server = setup();

        let response = server.delete("/api/tasks/missing").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sort_reorders_once() {
        let server = setup_with(vec![
            Task::new("late", "Late")
                .with_order(0)
                .with_dates(d("2024-05-01"), None),
            Task::new("early", "Early")
                .with_order(1)
                .with_dates(d("2024-04-01"), None),
        ]);

        let first: StoredDocument = server
            .post("/api/tasks/sort")
            .json(&SortChildrenInput::default())
            .await
            .json();
        assert_eq!(first.revision, 1);
        let early = first.doc.tasks.iter().find(|t| t.id == "early").unwrap();
        assert_eq!(early.order, 0);

        let second: StoredDocument = server
            .post("/api/tasks/sort")
            .json(&SortChildrenInput::default())
            .await
            .json();
        assert_eq!(second.revision, 1);
    }
}
