//! Blog API demo: posts, tags, comments and users served with sortable,
//! pageable listings
//!
//! Try:
//!
//! ```text
//! curl 'http://127.0.0.1:3000/posts?sortBy=likes&orderBy=desc&currentPage=1&pageSize=3'
//! curl -X POST http://127.0.0.1:3000/posts/grid -H 'content-type: application/json' \
//!   -d '{"draw":1,"start":0,"length":5,"search":{"value":"rust"},
//!        "order":[{"column":1,"dir":"asc"}],
//!        "columns":[{"data":"title"},{"data":"likes"}]}'
//! ```

use chrono::Duration;
use folio::prelude::*;
use tracing_subscriber::EnvFilter;

impl_entity!(Post, "post", "posts", search: ["title", "body"], {
    title: String,
    body: String,
    author: String,
    likes: i64,
    published_at: Option<DateTime<Utc>>,
});

impl_entity!(Tag, "tag", "tags", search: ["name"], {
    name: String,
    usage_count: i64,
});

impl_entity!(Comment, "comment", "comments", search: ["body"], {
    post_id: Uuid,
    author: String,
    body: String,
});

impl_entity!(User, "user", "users", search: ["name", "email"], {
    name: String,
    email: String,
    karma: i64,
});

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,folio=debug")),
        )
        .init();

    let posts = InMemoryRepository::<Post>::new();
    let tags = InMemoryRepository::<Tag>::new();
    let comments = InMemoryRepository::<Comment>::new();
    let users = InMemoryRepository::<User>::new();

    seed(&posts, &tags, &comments, &users)?;

    let builder = match std::env::var("FOLIO_CONFIG") {
        Ok(path) => ServerBuilder::new().with_config_file(path)?,
        Err(_) => ServerBuilder::new().with_config(ListingConfig::default_config()),
    };

    builder
        .register_listing::<Post>(posts)
        .register_listing::<Tag>(tags)
        .register_listing::<Comment>(comments)
        .register_listing::<User>(users)
        .serve("127.0.0.1:3000")
        .await
}

fn seed(
    posts: &InMemoryRepository<Post>,
    tags: &InMemoryRepository<Tag>,
    comments: &InMemoryRepository<Comment>,
    users: &InMemoryRepository<User>,
) -> FolioResult<()> {
    let now = Utc::now();

    let drafts = [
        ("Ownership in practice", "Borrowing rules explained with rust examples", "alice", 42, Some(3)),
        ("Async without tears", "A tour of tokio and async rust", "bob", 17, Some(2)),
        ("Grid widgets 101", "Server side paging for table widgets", "alice", 17, Some(1)),
        ("Unpublished thoughts", "Notes on sorting by several keys", "carol", 0, None),
        ("Error handling patterns", "Typed errors and the question mark", "bob", 58, Some(5)),
    ];

    let mut first_post = None;
    for (title, body, author, likes, days_ago) in drafts {
        let post = posts.insert(Post::new(
            title.to_string(),
            body.to_string(),
            author.to_string(),
            likes,
            days_ago.map(|days| now - Duration::days(days)),
        ))?;
        first_post.get_or_insert(post.id);
    }

    tags.extend(
        [("rust", 12), ("async", 4), ("web", 7), ("errors", 4)]
            .into_iter()
            .map(|(name, count)| Tag::new(name.to_string(), count)),
    )?;

    if let Some(post_id) = first_post {
        comments.extend([
            Comment::new(post_id, "bob".to_string(), "Great write-up".to_string()),
            Comment::new(post_id, "carol".to_string(), "The rust examples helped".to_string()),
        ])?;
    }

    users.extend([
        User::new("Alice".to_string(), "alice@example.com".to_string(), 120),
        User::new("Bob".to_string(), "bob@example.com".to_string(), 80),
        User::new("Carol".to_string(), "carol@example.com".to_string(), 95),
    ])?;

    tracing::info!(
        posts = 5,
        tags = 4,
        comments = 2,
        users = 3,
        "seeded blog data"
    );

    Ok(())
}
