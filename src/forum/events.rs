//! Forum event broadcasting for Agora.
//!
//! Successful writes publish a domain event on a broadcast channel;
//! WebSocket viewers subscribe and forward them to clients. Sending is
//! fire-and-forget: a write never waits on or fails because of a viewer.

use tokio::sync::broadcast;

use super::comment::Comment;
use super::post::Post;

/// Maximum number of events to buffer in the broadcast channel.
const CHANNEL_CAPACITY: usize = 100;

/// Domain event published after a successful write.
#[derive(Debug, Clone)]
pub enum ForumEvent {
    /// A new post was created.
    PostCreated(Post),
    /// A new comment was created.
    CommentCreated(Comment),
}

/// Create the forum event broadcast channel.
///
/// The receiver half is dropped; subscribers call `subscribe()` on the
/// sender when they connect.
pub fn channel() -> broadcast::Sender<ForumEvent> {
    let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
    sender
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_subscribers_does_not_block() {
        let sender = channel();
        let post = Post {
            id: 1,
            title: "Title".to_string(),
            subtitle: "Subtitle".to_string(),
            user_id: 1,
            created_at: "2024-01-01 12:00:00".to_string(),
        };

        // No receivers; send returns an error which callers ignore
        assert!(sender.send(ForumEvent::PostCreated(post)).is_err());
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let sender = channel();
        let mut rx = sender.subscribe();

        let comment = Comment {
            id: 1,
            content: "Hello".to_string(),
            user_id: 1,
            post_id: 2,
            created_at: "2024-01-01 12:00:00".to_string(),
        };
        sender
            .send(ForumEvent::CommentCreated(comment))
            .unwrap();

        match rx.recv().await.unwrap() {
            ForumEvent::CommentCreated(c) => {
                assert_eq!(c.content, "Hello");
                assert_eq!(c.post_id, 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
