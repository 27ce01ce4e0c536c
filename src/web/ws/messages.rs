//! WebSocket message types for the event stream.

use serde::Serialize;

use crate::datetime::format_event_timestamp;
use crate::forum::ForumEvent;

/// Messages sent from server to client.
///
/// The event stream is one-way; clients never send anything but
/// protocol-level pings.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A post was created.
    Post {
        /// Post title.
        title: String,
        /// Post subtitle.
        subtitle: String,
        /// Creation time, minute resolution.
        timestamp: String,
    },
    /// A comment was created.
    Comment {
        /// Comment body.
        content: String,
        /// Creation time, minute resolution.
        timestamp: String,
        /// Id of the post commented on.
        post_id: i64,
    },
}

impl From<&ForumEvent> for ServerMessage {
    fn from(event: &ForumEvent) -> Self {
        match event {
            ForumEvent::PostCreated(post) => ServerMessage::Post {
                title: post.title.clone(),
                subtitle: post.subtitle.clone(),
                timestamp: format_event_timestamp(&post.created_at),
            },
            ForumEvent::CommentCreated(comment) => ServerMessage::Comment {
                content: comment.content.clone(),
                timestamp: format_event_timestamp(&comment.created_at),
                post_id: comment.post_id,
            },
        }
    }
}
