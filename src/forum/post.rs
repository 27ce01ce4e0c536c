//! Post model for Agora.

/// Post entity representing a top-level forum entry.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Post subtitle (may be empty).
    pub subtitle: String,
    /// ID of the user who created the post.
    pub user_id: i64,
    /// Post creation timestamp.
    pub created_at: String,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Post subtitle.
    pub subtitle: String,
    /// ID of the user creating the post.
    pub user_id: i64,
}

impl NewPost {
    /// Create a new post with required fields.
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, user_id: i64) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post() {
        let post = NewPost::new("Title", "Subtitle", 3);
        assert_eq!(post.title, "Title");
        assert_eq!(post.subtitle, "Subtitle");
        assert_eq!(post.user_id, 3);
    }
}
