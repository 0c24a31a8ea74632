//! Router Tests
//!
//! Drive the full router (auth, handlers, views) over HTTP against the
//! in-memory conversation store.

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use core_kernel::{ConversationId, UserId};
use domain_conversation::{Conversation, MockConversationPort, SpeakerType};
use interface_api::{auth, config::ApiConfig, create_router};
use test_utils::{ConversationBuilder, ConversationFixtures, IdFixtures, TemporalFixtures};

const SECRET: &str = "routes-test-secret";

fn config() -> ApiConfig {
    ApiConfig {
        jwt_secret: SECRET.to_string(),
        ..ApiConfig::default()
    }
}

fn server(port: MockConversationPort) -> TestServer {
    TestServer::new(create_router(Arc::new(port), config())).unwrap()
}

fn bearer(user: UserId) -> (HeaderName, HeaderValue) {
    let token = auth::create_token(user, SECRET, 300).unwrap();
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

fn location(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn detail_path(conversation: &Conversation) -> String {
    format!("/conversations/{}", conversation.id.as_uuid())
}

mod authentication {
    use super::*;

    #[tokio::test]
    async fn test_conversations_require_a_token() {
        let server = server(MockConversationPort::new());

        let response = server.get("/conversations").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        let response = server
            .post("/conversations/new")
            .form(&ConversationFixtures::a1_form())
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_signed_with_another_secret_is_rejected() {
        let server = server(MockConversationPort::new());
        let token = auth::create_token(IdFixtures::owner(), "someone-elses-secret", 300).unwrap();

        let response = server
            .get("/conversations")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_cookie_is_accepted() {
        let server = server(MockConversationPort::new());
        let token = auth::create_token(IdFixtures::owner(), SECRET, 300).unwrap();

        let response = server
            .get("/conversations")
            .add_header(
                header::COOKIE,
                HeaderValue::from_str(&format!("session={}", token)).unwrap(),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_home_links_to_list_when_signed_in() {
        let server = server(MockConversationPort::new());

        let anonymous = server.get("/").await;
        assert!(anonymous.text().contains("Sign in to see your conversations."));

        let (name, value) = bearer(IdFixtures::owner());
        let signed_in = server.get("/").add_header(name, value).await;
        assert!(signed_in.text().contains("Your conversations"));
    }

    #[tokio::test]
    async fn test_public_pages_need_no_token() {
        let server = server(MockConversationPort::new());

        assert_eq!(server.get("/").await.status_code(), StatusCode::OK);
        assert_eq!(server.get("/health").await.status_code(), StatusCode::OK);
    }
}

mod create_conversation {
    use super::*;

    #[tokio::test]
    async fn test_valid_form_redirects_to_detail_page() {
        let port = MockConversationPort::new();
        let server = server(port.clone());
        let (name, value) = bearer(IdFixtures::owner());

        let response = server
            .post("/conversations/new")
            .add_header(name.clone(), value.clone())
            .form(&ConversationFixtures::a1_form())
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        let target = location(&response);
        assert!(target.starts_with("/conversations/"));
        assert_eq!(port.len().await, 1);

        let detail = server.get(&target).add_header(name, value).await;
        assert_eq!(detail.status_code(), StatusCode::OK);
        assert!(detail.text().contains("Level A1, Course 2, Lesson 14"));
    }

    #[tokio::test]
    async fn test_missing_fields_are_reported_together() {
        let port = MockConversationPort::new();
        let server = server(port.clone());
        let (name, value) = bearer(IdFixtures::owner());

        let response = server
            .post("/conversations/new")
            .add_header(name, value)
            .form(&[("level", ""), ("course", ""), ("lesson", "")])
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let page = response.text();
        assert!(page.contains("level is required"));
        assert!(page.contains("course is required"));
        assert!(page.contains("lesson is required"));
        assert!(port.is_empty().await);
    }

    #[tokio::test]
    async fn test_each_missing_field_has_its_own_message() {
        let server = server(MockConversationPort::new());
        let (name, value) = bearer(IdFixtures::owner());

        for (missing, message) in [
            ("level", "level is required"),
            ("course", "course is required"),
            ("lesson", "lesson is required"),
        ] {
            let fields: Vec<_> = ConversationFixtures::a1_form()
                .into_iter()
                .filter(|(field, _)| *field != missing)
                .collect();

            let response = server
                .post("/conversations/new")
                .add_header(name.clone(), value.clone())
                .form(&fields)
                .await;

            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{missing}");
            assert!(response.text().contains(message), "{missing}");
        }
    }

    #[tokio::test]
    async fn test_unknown_level_is_filed_under_business() {
        let port = MockConversationPort::new();
        let server = server(port.clone());
        let (name, value) = bearer(IdFixtures::owner());

        let response = server
            .post("/conversations/new")
            .add_header(name.clone(), value.clone())
            .form(&[("level", "Business English"), ("course", "1"), ("lesson", "3")])
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        let detail = server.get(&location(&response)).add_header(name, value).await;
        assert!(detail.text().contains("Level Business, Course 1, Lesson 3"));
    }

    #[tokio::test]
    async fn test_rejected_form_is_escaped() {
        let server = server(MockConversationPort::new());
        let (name, value) = bearer(IdFixtures::owner());

        let response = server
            .post("/conversations/new")
            .add_header(name, value)
            .form(&[("level", "A1"), ("course", "\"><script>x</script>"), ("lesson", "1")])
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(!response.text().contains("<script>x</script>"));
    }
}

mod list_conversations {
    use super::*;
    use domain_conversation::Level;

    #[tokio::test]
    async fn test_only_own_conversations_newest_first() {
        let older = ConversationBuilder::new()
            .with_level(Level::A2)
            .with_course(7)
            .created_at(TemporalFixtures::days_later(1))
            .build();
        let newer = ConversationBuilder::new()
            .with_level(Level::C1)
            .with_course(8)
            .created_at(TemporalFixtures::days_later(2))
            .build();
        let foreign = ConversationBuilder::new()
            .with_owner(IdFixtures::stranger())
            .with_level(Level::Business)
            .with_course(99)
            .build();

        let port = MockConversationPort::with_conversations(vec![older, newer, foreign]).await;
        let server = server(port);
        let (name, value) = bearer(IdFixtures::owner());

        let response = server.get("/conversations").add_header(name, value).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let page = response.text();
        let newer_at = page.find("Level C1, Course 8").expect("newer listed");
        let older_at = page.find("Level A2, Course 7").expect("older listed");
        assert!(newer_at < older_at);
        assert!(!page.contains("Course 99"));
    }

    #[tokio::test]
    async fn test_empty_list() {
        let server = server(MockConversationPort::new());
        let (name, value) = bearer(IdFixtures::owner());

        let response = server.get("/conversations").add_header(name, value).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("No conversations yet."));
    }
}

mod conversation_detail {
    use super::*;

    #[tokio::test]
    async fn test_sentences_render_in_order() {
        let conversation = ConversationBuilder::new()
            .with_script(ConversationFixtures::sport_tickets_script())
            .build();
        let path = detail_path(&conversation);
        let server = server(MockConversationPort::with_conversations(vec![conversation]).await);
        let (name, value) = bearer(IdFixtures::owner());

        let response = server.get(&path).add_header(name, value).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let page = response.text();
        let first = page.find("Do you like swimming?").expect("first line");
        let last = page.find("so excited!").expect("last line");
        assert!(first < last);
        assert!(page.contains(r#"<p class="narration">"#));
    }

    #[tokio::test]
    async fn test_not_found_cases() {
        let conversation = ConversationBuilder::new().build();
        let path = detail_path(&conversation);
        let server = server(MockConversationPort::with_conversations(vec![conversation]).await);

        let (name, value) = bearer(IdFixtures::stranger());
        let response = server.get(&path).add_header(name, value).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let (name, value) = bearer(IdFixtures::owner());
        let missing = format!("/conversations/{}", ConversationId::new().as_uuid());
        let response = server.get(&missing).add_header(name.clone(), value.clone()).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let response = server
            .get("/conversations/not-a-uuid")
            .add_header(name, value)
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}

mod add_sentence {
    use super::*;
    use domain_conversation::ConversationPort;

    #[tokio::test]
    async fn test_sentence_is_appended() {
        let conversation = ConversationBuilder::new()
            .with_sentence(SpeakerType::Description, "At the station.")
            .build();
        let id = conversation.id;
        let path = detail_path(&conversation);
        let port = MockConversationPort::with_conversations(vec![conversation]).await;
        let server = server(port.clone());
        let (name, value) = bearer(IdFixtures::owner());

        let response = server
            .post(&format!("{}/sentences", path))
            .add_header(name, value)
            .form(&[("speaker", "PersonA"), ("text", "Where is platform 3?")])
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), path);

        let stored = port.get_conversation(id, IdFixtures::owner()).await.unwrap();
        assert_eq!(stored.sentences.len(), 2);
        assert_eq!(stored.sentences[1].position, 2);
        assert_eq!(stored.sentences[1].speaker, SpeakerType::PersonA);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let conversation = ConversationBuilder::new().build();
        let path = detail_path(&conversation);
        let port = MockConversationPort::with_conversations(vec![conversation]).await;
        let server = server(port);
        let (name, value) = bearer(IdFixtures::owner());

        let response = server
            .post(&format!("{}/sentences", path))
            .add_header(name, value)
            .form(&[("speaker", "PersonB"), ("text", "   ")])
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("text is required"));
    }

    #[tokio::test]
    async fn test_foreign_conversation_is_not_found() {
        let conversation = ConversationBuilder::new().build();
        let path = detail_path(&conversation);
        let server = server(MockConversationPort::with_conversations(vec![conversation]).await);
        let (name, value) = bearer(IdFixtures::stranger());

        let response = server
            .post(&format!("{}/sentences", path))
            .add_header(name, value)
            .form(&[("speaker", "PersonA"), ("text", "Hello")])
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_form_on_foreign_or_missing_conversation_is_not_found() {
        let conversation = ConversationBuilder::new().build();
        let path = detail_path(&conversation);
        let server = server(MockConversationPort::with_conversations(vec![conversation]).await);

        let (name, value) = bearer(IdFixtures::stranger());
        let response = server
            .post(&format!("{}/sentences", path))
            .add_header(name, value)
            .form(&[("speaker", "PersonA"), ("text", "")])
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let (name, value) = bearer(IdFixtures::owner());
        let missing = format!("/conversations/{}/sentences", ConversationId::new().as_uuid());
        let response = server
            .post(&missing)
            .add_header(name, value)
            .form(&[("speaker", "PersonA"), ("text", "")])
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_explicit_position_places_sentence_in_script() {
        let conversation = ConversationBuilder::new()
            .with_script(ConversationFixtures::sport_tickets_script())
            .build();
        let path = detail_path(&conversation);
        let server = server(MockConversationPort::with_conversations(vec![conversation]).await);
        let (name, value) = bearer(IdFixtures::owner());

        let response = server
            .post(&format!("{}/sentences", path))
            .add_header(name.clone(), value.clone())
            .form(&[("speaker", "PersonB"), ("text", "Hallo Ren!"), ("position", "1")])
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

        let page = server.get(&path).add_header(name, value).await.text();
        let opening = page.find("Es ist beinah").expect("opening line");
        let inserted = page.find("Hallo Ren!").expect("inserted line");
        let second = page.find("What do you want to see, Aida?").expect("second line");
        let last = page.find("so excited!").expect("last line");
        assert!(opening < inserted);
        assert!(inserted < second);
        assert!(second < last);
    }

    #[tokio::test]
    async fn test_position_beyond_bound_is_rejected() {
        let conversation = ConversationBuilder::new().build();
        let path = detail_path(&conversation);
        let server = server(MockConversationPort::with_conversations(vec![conversation]).await);
        let (name, value) = bearer(IdFixtures::owner());

        let response = server
            .post(&format!("{}/sentences", path))
            .add_header(name, value)
            .form(&[("text", "Overflow?"), ("position", "2147483647")])
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("position must be a positive number"));
    }
}

mod delete_conversation {
    use super::*;

    #[tokio::test]
    async fn test_owner_deletes() {
        let conversation = ConversationBuilder::new().with_random_sentences(4).build();
        let id = conversation.id;
        let path = detail_path(&conversation);
        let port = MockConversationPort::with_conversations(vec![conversation]).await;
        let server = server(port.clone());
        let (name, value) = bearer(IdFixtures::owner());

        let response = server
            .post(&format!("{}/delete", path))
            .add_header(name.clone(), value.clone())
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/conversations");
        assert!(!port.contains(id).await);

        let response = server.get(&path).add_header(name, value).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stranger_cannot_delete() {
        let conversation = ConversationBuilder::new().build();
        let id = conversation.id;
        let path = detail_path(&conversation);
        let port = MockConversationPort::with_conversations(vec![conversation]).await;
        let server = server(port.clone());
        let (name, value) = bearer(IdFixtures::stranger());

        let response = server
            .post(&format!("{}/delete", path))
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert!(port.contains(id).await);
    }
}

mod health {
    use super::*;
    use async_trait::async_trait;
    use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
    use domain_conversation::{
        ConversationPort, ConversationSummary, NewConversation, NewSentence, Sentence,
    };

    /// A store that answers queries but reports itself as down
    struct UnhealthyPort(MockConversationPort);

    impl DomainPort for UnhealthyPort {}

    #[async_trait]
    impl HealthCheckable for UnhealthyPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::unhealthy("unhealthy", 5, "connection refused")
        }
    }

    #[async_trait]
    impl ConversationPort for UnhealthyPort {
        async fn list_conversations(&self, owner: UserId) -> Result<Vec<ConversationSummary>, PortError> {
            self.0.list_conversations(owner).await
        }

        async fn get_conversation(&self, id: ConversationId, owner: UserId) -> Result<Conversation, PortError> {
            self.0.get_conversation(id, owner).await
        }

        async fn create_conversation(
            &self,
            owner: UserId,
            request: NewConversation,
        ) -> Result<Conversation, PortError> {
            self.0.create_conversation(owner, request).await
        }

        async fn add_sentence(
            &self,
            id: ConversationId,
            owner: UserId,
            request: NewSentence,
        ) -> Result<Sentence, PortError> {
            self.0.add_sentence(id, owner, request).await
        }

        async fn delete_conversation(&self, id: ConversationId, owner: UserId) -> Result<(), PortError> {
            self.0.delete_conversation(id, owner).await
        }
    }

    #[tokio::test]
    async fn test_ready_with_healthy_store() {
        let server = server(MockConversationPort::new());

        let response = server.get("/health/ready").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn test_unavailable_when_store_is_down() {
        let port = UnhealthyPort(MockConversationPort::new());
        let server = TestServer::new(create_router(Arc::new(port), config())).unwrap();

        let response = server.get("/health/ready").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let server = server(MockConversationPort::new());

        let response = server.get("/health").await;
        assert!(response.headers().contains_key("x-request-id"));
    }
}
