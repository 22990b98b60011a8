//! Endpoint methods. Each one supplies a path, parameters and a target type
//! to the generic pipeline in `client`.

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::http::Transport;
use crate::types::{
    CreateToken, CreatedToken, Node, Notification, Profile, Reply, TokenExpiration, TokenInfo, TokenScope, Topic,
    TopicSummary,
};

/// Query key the API uses for the 1-based page number.
pub const PAGE_PARAM: &str = "p";

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

impl<T: Transport> Client<T> {
    pub fn node(&self, name: &str) -> Result<Node> {
        self.request(Endpoint::get(format!("/nodes/{}", segment(name))))
    }

    pub fn node_topics(&self, name: &str, page: u32) -> Result<Vec<TopicSummary>> {
        self.request(Endpoint::get(format!("/nodes/{}/topics", segment(name))).query(PAGE_PARAM, page))
    }

    pub fn topic(&self, id: u64) -> Result<Topic> {
        self.request(Endpoint::get(format!("/topics/{id}")))
    }

    pub fn topic_replies(&self, id: u64, page: u32) -> Result<Vec<Reply>> {
        self.request(Endpoint::get(format!("/topics/{id}/replies")).query(PAGE_PARAM, page))
    }

    /// Details of the token this client authenticates with.
    pub fn token(&self) -> Result<TokenInfo> {
        self.request(Endpoint::get("/token"))
    }

    pub fn create_token(&self, scope: TokenScope, expiration: TokenExpiration) -> Result<CreatedToken> {
        let body = CreateToken { scope, expiration };
        self.request(Endpoint::post("/tokens").json(&body)?)
    }

    /// The authenticated member's own profile.
    pub fn member(&self) -> Result<Profile> {
        self.request(Endpoint::get("/member"))
    }

    pub fn notifications(&self, page: u32) -> Result<Vec<Notification>> {
        self.request(Endpoint::get("/notifications").query(PAGE_PARAM, page))
    }

    pub fn delete_notification(&self, id: u64) -> Result<()> {
        self.command(Endpoint::delete(format!("/notifications/{id}")))
    }
}
