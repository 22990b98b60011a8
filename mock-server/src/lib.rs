use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, RawQuery, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_PREFIX: &str = "/api/v2";
pub const PAGE_SIZE: usize = 20;
pub const SEED_TOKEN_EXPIRATION: u64 = 15_552_000;

const VALID_EXPIRATIONS: [u64; 4] = [2_592_000, 5_184_000, 7_776_000, 15_552_000];
const SEED_TIME: i64 = 1_700_000_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub result: Option<T>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: u64,
    pub name: String,
    pub title: String,
    pub url: String,
    pub topics: u64,
    pub avatar: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub created: i64,
    pub last_modified: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub username: String,
    pub url: String,
    pub website: Option<String>,
    pub github: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub created: i64,
}

#[derive(Clone, Debug)]
struct TopicRecord {
    id: u64,
    node: String,
    member_id: u64,
    title: String,
    content: String,
    replies: u64,
    created: i64,
}

#[derive(Clone, Debug)]
struct ReplyRecord {
    id: u64,
    topic_id: u64,
    member_id: u64,
    content: String,
    created: i64,
}

#[derive(Clone, Debug)]
struct NotificationRecord {
    id: u64,
    from_member_id: u64,
    text: String,
    payload: Option<String>,
    created: i64,
}

#[derive(Clone, Debug)]
struct TokenRecord {
    scope: String,
    expiration: u64,
    total_used: u64,
    last_used: i64,
    created: i64,
}

/// In-memory state behind the mock API.
#[derive(Debug)]
pub struct Store {
    nodes: Vec<Node>,
    members: Vec<Member>,
    /// Member the authenticated tokens belong to.
    owner_id: u64,
    topics: Vec<TopicRecord>,
    replies: Vec<ReplyRecord>,
    notifications: Vec<NotificationRecord>,
    tokens: HashMap<String, TokenRecord>,
}

pub type Db = Arc<RwLock<Store>>;

/// Token the bearer middleware found on the request.
#[derive(Clone, Debug)]
struct AuthToken(String);

#[derive(Deserialize)]
struct PageQuery {
    p: Option<usize>,
}

#[derive(Deserialize)]
struct CreateTokenInput {
    scope: String,
    expiration: u64,
}

impl Store {
    pub fn seeded(token: &str) -> Self {
        let members = ["livid", "alice", "bob"]
            .iter()
            .zip(1u64..)
            .map(|(name, id)| Member {
                id,
                username: name.to_string(),
                url: format!("https://www.v2ex.com/member/{name}"),
                website: None,
                github: Some(name.to_string()),
                bio: None,
                avatar: Some(format!("https://cdn.v2ex.com/avatar/{id}.png")),
                created: SEED_TIME - 86_400 * id as i64,
            })
            .collect();

        let topics: Vec<TopicRecord> = (1..=25u64)
            .map(|id| TopicRecord {
                id,
                node: "go".to_string(),
                member_id: id % 3 + 1,
                title: format!("Topic {id}"),
                content: format!("Body of topic {id}"),
                replies: if id == 1 { 3 } else { 0 },
                created: SEED_TIME + id as i64,
            })
            .collect();

        let nodes = vec![
            node(1, "go", "Go", topics.len() as u64),
            node(2, "rust", "Rust", 0),
        ];

        let replies = (1..=3u64)
            .map(|id| ReplyRecord {
                id,
                topic_id: 1,
                member_id: id,
                content: format!("Reply {id}"),
                created: SEED_TIME + 100 + id as i64,
            })
            .collect();

        let notifications = (40..=42u64)
            .map(|id| NotificationRecord {
                id,
                from_member_id: 3,
                text: format!("bob replied to your topic ({id})"),
                payload: Some(format!("notification {id}")),
                created: SEED_TIME + id as i64,
            })
            .collect();

        let mut tokens = HashMap::new();
        tokens.insert(
            token.to_string(),
            TokenRecord {
                scope: "everything".to_string(),
                expiration: SEED_TOKEN_EXPIRATION,
                total_used: 0,
                last_used: 0,
                created: SEED_TIME,
            },
        );

        Self {
            nodes,
            members,
            owner_id: 2,
            topics,
            replies,
            notifications,
            tokens,
        }
    }

    fn member(&self, id: u64) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }
}

fn node(id: u64, name: &str, title: &str, topics: u64) -> Node {
    Node {
        id,
        name: name.to_string(),
        title: title.to_string(),
        url: format!("https://www.v2ex.com/go/{name}"),
        topics,
        avatar: None,
        header: Some(format!("{title} header")),
        footer: None,
        created: SEED_TIME,
        last_modified: SEED_TIME,
    }
}

/// Router with every API route under `/api/v2`, authorized by `token`.
pub fn app(token: &str) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded(token)));
    let api = Router::new()
        .route("/nodes/{name}", get(get_node))
        .route("/nodes/{name}/topics", get(node_topics))
        .route("/topics/{id}", get(get_topic))
        .route("/topics/{id}/replies", get(topic_replies))
        .route("/token", get(get_token))
        .route("/tokens", post(create_token))
        .route("/member", get(get_member))
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}", axum::routing::delete(delete_notification))
        .route("/echo", any(echo))
        .route_layer(middleware::from_fn_with_state(db.clone(), require_token))
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

fn ok<T: Serialize>(result: T) -> Response {
    Json(Envelope {
        success: true,
        message: String::new(),
        result: Some(result),
    })
    .into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    let body: Envelope<Value> = Envelope {
        success: false,
        message: message.to_string(),
        result: None,
    };
    (status, Json(body)).into_response()
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn paginate<T: Clone>(items: &[T], page: Option<usize>) -> Vec<T> {
    let page = page.unwrap_or(1).max(1);
    items.iter().skip((page - 1).saturating_mul(PAGE_SIZE)).take(PAGE_SIZE).cloned().collect()
}

async fn require_token(State(db): State<Db>, mut req: Request, next: Next) -> Response {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let authorized = match presented {
        Some(token) => {
            let mut store = db.write().await;
            match store.tokens.get_mut(&token) {
                Some(record) => {
                    record.total_used += 1;
                    record.last_used = unix_now();
                    Some(token)
                }
                None => None,
            }
        }
        None => None,
    };

    let Some(token) = authorized else {
        tracing::info!(method = %req.method(), path = %req.uri().path(), "rejected unauthenticated request");
        return fail(StatusCode::UNAUTHORIZED, "invalid token");
    };

    tracing::info!(method = %req.method(), path = %req.uri().path(), "request");
    req.extensions_mut().insert(AuthToken(token));
    next.run(req).await
}

async fn get_node(State(db): State<Db>, Path(name): Path<String>) -> Response {
    let store = db.read().await;
    match store.nodes.iter().find(|n| n.name == name) {
        Some(node) => ok(node),
        None => fail(StatusCode::NOT_FOUND, "Node not found"),
    }
}

fn topic_summary(topic: &TopicRecord) -> Value {
    let last_reply_by = (topic.replies > 0).then_some("bob");
    json!({
        "id": topic.id,
        "title": topic.title,
        "content": topic.content,
        "content_rendered": format!("<p>{}</p>", topic.content),
        "syntax": 0,
        "url": format!("https://www.v2ex.com/t/{}", topic.id),
        "replies": topic.replies,
        "last_reply_by": last_reply_by,
        "created": topic.created,
        "last_modified": topic.created,
        "last_touched": topic.created,
    })
}

fn member_json(member: &Member) -> Value {
    json!({
        "id": member.id,
        "username": member.username,
        "url": member.url,
        "website": member.website,
        "github": member.github,
        "bio": member.bio,
        "avatar_mini": member.avatar,
        "avatar_normal": member.avatar,
        "avatar_large": member.avatar,
        "created": member.created,
        "last_modified": member.created,
    })
}

async fn node_topics(
    State(db): State<Db>,
    Path(name): Path<String>,
    Query(page): Query<PageQuery>,
) -> Response {
    let store = db.read().await;
    if !store.nodes.iter().any(|n| n.name == name) {
        return fail(StatusCode::NOT_FOUND, "Node not found");
    }
    let topics: Vec<TopicRecord> = store.topics.iter().filter(|t| t.node == name).cloned().collect();
    let page: Vec<Value> = paginate(&topics, page.p).iter().map(topic_summary).collect();
    ok(page)
}

async fn get_topic(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let store = db.read().await;
    let Some(topic) = store.topics.iter().find(|t| t.id == id) else {
        return fail(StatusCode::NOT_FOUND, "Topic not found");
    };
    let (Some(member), Some(node)) = (
        store.member(topic.member_id),
        store.nodes.iter().find(|n| n.name == topic.node),
    ) else {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Topic is missing its member or node");
    };

    let mut body = topic_summary(topic);
    body["member"] = member_json(member);
    body["node"] = json!(node);
    body["supplements"] = json!([]);
    ok(body)
}

async fn topic_replies(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Query(page): Query<PageQuery>,
) -> Response {
    let store = db.read().await;
    if !store.topics.iter().any(|t| t.id == id) {
        return fail(StatusCode::NOT_FOUND, "Topic not found");
    }
    let replies: Vec<ReplyRecord> = store.replies.iter().filter(|r| r.topic_id == id).cloned().collect();
    let page: Vec<Value> = paginate(&replies, page.p)
        .iter()
        .filter_map(|reply| {
            let member = store.member(reply.member_id)?;
            Some(json!({
                "id": reply.id,
                "content": reply.content,
                "content_rendered": format!("<p>{}</p>", reply.content),
                "created": reply.created,
                "member": member_json(member),
            }))
        })
        .collect();
    ok(page)
}

async fn get_token(State(db): State<Db>, Extension(AuthToken(token)): Extension<AuthToken>) -> Response {
    let store = db.read().await;
    let Some(record) = store.tokens.get(&token) else {
        return fail(StatusCode::UNAUTHORIZED, "invalid token");
    };
    ok(json!({
        "token": token,
        "scope": record.scope,
        "expiration": record.expiration,
        "good_for_days": record.expiration / 86_400,
        "total_used": record.total_used,
        "last_used": record.last_used,
        "created": record.created,
    }))
}

async fn create_token(State(db): State<Db>, body: String) -> Response {
    let Ok(input) = serde_json::from_str::<CreateTokenInput>(&body) else {
        return fail(StatusCode::BAD_REQUEST, "invalid request body");
    };
    if !matches!(input.scope.as_str(), "regular" | "everything") {
        return fail(StatusCode::BAD_REQUEST, "invalid scope");
    }
    if !VALID_EXPIRATIONS.contains(&input.expiration) {
        return fail(StatusCode::BAD_REQUEST, "invalid expiration");
    }

    let token = Uuid::new_v4().to_string();
    db.write().await.tokens.insert(
        token.clone(),
        TokenRecord {
            scope: input.scope,
            expiration: input.expiration,
            total_used: 0,
            last_used: 0,
            created: unix_now(),
        },
    );
    ok(json!({ "token": token }))
}

async fn get_member(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let Some(member) = store.member(store.owner_id) else {
        return fail(StatusCode::NOT_FOUND, "Member not found");
    };
    ok(json!({
        "id": member.id,
        "username": member.username,
        "url": member.url,
        "website": member.website,
        "github": member.github,
        "bio": member.bio,
        "avatar": member.avatar,
        "created": member.created,
    }))
}

async fn list_notifications(State(db): State<Db>, Query(page): Query<PageQuery>) -> Response {
    let store = db.read().await;
    let page: Vec<Value> = paginate(&store.notifications, page.p)
        .iter()
        .filter_map(|n| {
            let from = store.member(n.from_member_id)?;
            Some(json!({
                "id": n.id,
                "member_id": from.id,
                "for_member_id": store.owner_id,
                "text": n.text,
                "payload": n.payload,
                "payload_rendered": n.payload.as_ref().map(|p| format!("<p>{p}</p>")),
                "created": n.created,
                "member": { "username": from.username },
            }))
        })
        .collect();
    ok(page)
}

async fn delete_notification(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let mut store = db.write().await;
    let before = store.notifications.len();
    store.notifications.retain(|n| n.id != id);
    if store.notifications.len() == before {
        return fail(StatusCode::NOT_FOUND, "Notification not found");
    }
    ok(Value::Null)
}

/// Reflects what the server received, for request-building tests.
async fn echo(method: Method, RawQuery(query): RawQuery, headers: HeaderMap, body: String) -> Response {
    let header_str = |name| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::String(body))
    };
    ok(json!({
        "method": method.as_str(),
        "query": query,
        "authorization": header_str(header::AUTHORIZATION),
        "content_type": header_str(header::CONTENT_TYPE),
        "body": body,
    }))
}
