use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use modflow_shared::errors::{AppError, AppResult, ErrorCode};

use crate::collaborators::{Channel, Guild, Member, Platform, TargetMessage};

/// Discord REST API (v10) with bot-token auth.
#[derive(Clone)]
pub struct HttpPlatform {
    client: Client,
    base_url: String,
    token: String,
}

/// Snowflakes arrive as JSON strings; plain numbers are accepted too.
fn snowflake<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        Raw::Number(n) => Ok(n),
    }
}

fn optional_snowflake<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "snowflake")] u64);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(id)| id))
}

#[derive(Debug, Deserialize)]
struct GuildBody {
    #[serde(deserialize_with = "snowflake")]
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ChannelBody {
    #[serde(deserialize_with = "snowflake")]
    id: u64,
    /// Absent for DM channels.
    #[serde(default, deserialize_with = "optional_snowflake")]
    guild_id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorBody {
    username: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(deserialize_with = "snowflake")]
    id: u64,
    content: String,
    author: AuthorBody,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    #[serde(deserialize_with = "snowflake")]
    id: u64,
    username: String,
}

#[derive(Debug, Deserialize)]
struct MemberBody {
    user: UserBody,
}

#[derive(Debug, Deserialize)]
struct DmChannelBody {
    #[serde(deserialize_with = "snowflake")]
    id: u64,
}

#[derive(Debug, Serialize)]
struct CreateDm {
    recipient_id: String,
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

const MEMBER_SEARCH_LIMIT: &str = "10";

fn unavailable(what: &str, e: impl std::fmt::Display) -> AppError {
    AppError::new(ErrorCode::ServiceUnavailable, format!("{what} request failed: {e}"))
}

fn undelivered(e: impl std::fmt::Display) -> AppError {
    AppError::new(ErrorCode::DeliveryFailed, format!("direct message failed: {e}"))
}

impl HttpPlatform {
    pub fn new(client: Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("Authorization", format!("Bot {}", self.token))
    }

    /// `Ok(None)` on 404, the decoded body on success.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> AppResult<Option<T>> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| unavailable(path, e))?;
        decode_optional(path, response).await
    }

    async fn open_dm_channel(&self, user_id: u64) -> AppResult<u64> {
        let response = self
            .request(Method::POST, "/users/@me/channels")
            .json(&CreateDm { recipient_id: user_id.to_string() })
            .send()
            .await
            .map_err(undelivered)?;

        let body: DmChannelBody = ensure_delivered(response).await?.json().await.map_err(undelivered)?;
        Ok(body.id)
    }
}

async fn decode_optional<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<Option<T>> {
    match response.status() {
        StatusCode::NOT_FOUND => Ok(None),
        status if status.is_success() => response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| unavailable(path, e)),
        status => Err(unavailable(path, format!("status {status}"))),
    }
}

async fn ensure_delivered(response: Response) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(undelivered(format!("status {status}: {body}")))
}

#[async_trait]
impl Platform for HttpPlatform {
    async fn get_guild(&self, guild_id: u64) -> AppResult<Option<Guild>> {
        let body: Option<GuildBody> = self.get_optional(&format!("/guilds/{guild_id}")).await?;
        Ok(body.map(|g| Guild { id: g.id, name: g.name }))
    }

    async fn get_channel(&self, guild: &Guild, channel_id: u64) -> AppResult<Option<Channel>> {
        let body: Option<ChannelBody> = self.get_optional(&format!("/channels/{channel_id}")).await?;

        // A channel id from some other guild does not belong to this link.
        Ok(body
            .filter(|c| c.guild_id == Some(guild.id))
            .map(|c| Channel {
                id: c.id,
                guild_id: guild.id,
                name: c.name.unwrap_or_default(),
            }))
    }

    async fn fetch_message(&self, channel: &Channel, message_id: u64) -> AppResult<TargetMessage> {
        let path = format!("/channels/{}/messages/{message_id}", channel.id);
        let body: MessageBody = self.get_optional(&path).await?.ok_or_else(|| {
            AppError::new(
                ErrorCode::MessageNotFound,
                format!("message {message_id} not found in channel {}", channel.id),
            )
        })?;

        Ok(TargetMessage {
            id: body.id,
            channel_id: channel.id,
            guild_id: channel.guild_id,
            author_name: body.author.username,
            content: body.content,
        })
    }

    async fn find_member(&self, guild_id: u64, name: &str) -> AppResult<Option<Member>> {
        let path = format!("/guilds/{guild_id}/members/search");
        let response = self
            .request(Method::GET, &path)
            .query(&[("query", name), ("limit", MEMBER_SEARCH_LIMIT)])
            .send()
            .await
            .map_err(|e| unavailable(&path, e))?;

        // Search is a prefix match; only an exact username counts.
        let members: Vec<MemberBody> = decode_optional(&path, response).await?.unwrap_or_default();
        Ok(members
            .into_iter()
            .find(|m| m.user.username == name)
            .map(|m| Member { user_id: m.user.id, name: m.user.username }))
    }

    async fn send_direct_message(&self, user_id: u64, text: &str) -> AppResult<()> {
        let dm_channel = self.open_dm_channel(user_id).await?;

        let response = self
            .request(Method::POST, &format!("/channels/{dm_channel}/messages"))
            .json(&CreateMessage { content: text })
            .send()
            .await
            .map_err(undelivered)?;
        ensure_delivered(response).await?;

        tracing::debug!(user_id, dm_channel, "direct message sent");
        Ok(())
    }
}
