use anyhow::Context;
use studium_client::{
    api::{
        AuthToken, BlogPost, Comment, CommentId, CommentKey, EntityRef, EntityType, FlashcardSet,
        ListQuery, NewComment, NewRating, NewSession, QuizSet, Resource,
    },
    apply_rating, ApiClient, CommentSection, InteractionsApi, RatingWidget,
};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long, env = "STUDIUM_HOST")]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Log in and print the session token
    Login { email: String, password: String },

    /// Print the comment tree of an entity
    Comments {
        /// Entity, as `blog:12`, `flashcard:3` or `quiz:7`
        entity: EntityRef,

        /// Print every thread instead of only the first page
        #[structopt(long)]
        all: bool,

        /// Number of extra pages to reveal
        #[structopt(long, default_value = "0")]
        more: usize,
    },

    /// Post a comment
    Comment {
        entity: EntityRef,

        content: String,

        #[structopt(long)]
        reply_to: Option<i64>,

        #[structopt(long)]
        image_url: Option<String>,
    },

    /// Delete one of your comments
    DeleteComment { id: i64 },

    /// Rate an entity from 1 to 5
    Rate { entity: EntityRef, value: u8 },

    /// Remove your rating of an entity
    Unrate { entity: EntityRef },

    /// List blogs, flashcard sets or quizzes
    Sets {
        /// One of `blog`, `flashcard`, `quiz`
        kind: EntityType,

        #[structopt(long, default_value = "0")]
        page: u32,

        #[structopt(long)]
        search: Option<String>,
    },
}

fn token() -> anyhow::Result<AuthToken> {
    let tok =
        std::env::var("STUDIUM_TOKEN").context("retrieving STUDIUM_TOKEN environment variable")?;
    Ok(AuthToken(tok))
}

fn print_comment(c: &Comment, indent: usize) {
    let id = match c.key {
        CommentKey::Saved(id) => id.to_string(),
        CommentKey::Pending(_) => String::from("?"),
    };
    println!(
        "{:indent$}#{id} {} ({}): {}",
        "",
        c.author_name,
        c.created_at.format("%Y-%m-%d %H:%M"),
        c.content,
        indent = indent,
    );
    if let Some(url) = &c.image_url {
        println!("{:indent$}  [{url}]", "", indent = indent);
    }
    for r in &c.replies {
        print_comment(r, indent + 4);
    }
}

async fn print_sets<T: Resource>(client: &ApiClient, query: &ListQuery) -> anyhow::Result<()> {
    let page = client
        .list::<T>(query)
        .await
        .with_context(|| format!("listing {}", T::COLLECTION))?;
    for item in &page.content {
        match item.id() {
            Some(id) => println!("{id:>6}  {}", item.title()),
            None => println!("     ?  {}", item.title()),
        }
    }
    println!(
        "page {}/{} ({} total)",
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opt = <Opt as structopt::StructOpt>::from_args();

    let client = ApiClient::new(opt.host);

    match opt.cmd {
        Command::Login { email, password } => {
            let tok = client
                .login(&NewSession { email, password })
                .await
                .context("logging in")?;
            println!("{}", tok.0);
        }
        Command::Comments { entity, all, more } => {
            let mut section = CommentSection::new(client.with_token(Some(token()?)), entity);
            section.refresh().await.map_err(|n| anyhow::anyhow!(n.0))?;
            let feed = section.feed_mut();
            for _ in 0..more {
                feed.show_more();
            }
            let shown = match all {
                true => feed.threads(),
                false => feed.visible(),
            };
            for c in shown {
                print_comment(c, 0);
            }
            if shown.len() < feed.total() {
                println!("... {} more threads", feed.total() - shown.len());
            }
        }
        Command::Comment {
            entity,
            content,
            reply_to,
            image_url,
        } => {
            let new = NewComment {
                content,
                image_url,
                parent_id: reply_to.map(CommentId),
            };
            new.validate()?;
            let saved = client
                .with_token(Some(token()?))
                .post_comment(entity, &new)
                .await
                .context("posting comment")?;
            tracing::debug!(?saved, "comment posted");
        }
        Command::DeleteComment { id } => {
            client
                .with_token(Some(token()?))
                .delete_comment(CommentId(id))
                .await
                .context("deleting comment")?;
        }
        Command::Rate { entity, value } => {
            NewRating::new(value)?;
            let client = client.with_token(Some(token()?));
            let current = client.my_rating(entity).await?.map(|r| r.rating_value);
            let mut widget = RatingWidget::new(current);
            if let Some(change) = widget.select(value) {
                apply_rating(&client, entity, change)
                    .await
                    .context("saving rating")?;
            }
            let summary = client.rating_summary(entity).await?;
            println!("{:.1} ({} ratings)", summary.average, summary.count);
        }
        Command::Unrate { entity } => {
            let client = client.with_token(Some(token()?));
            let current = client.my_rating(entity).await?.map(|r| r.rating_value);
            match RatingWidget::new(current).clear() {
                Some(change) => apply_rating(&client, entity, change)
                    .await
                    .context("deleting rating")?,
                None => tracing::info!(%entity, "nothing to remove, entity was not rated"),
            }
        }
        Command::Sets { kind, page, search } => {
            let client = client.with_token(token().ok());
            let mut query = ListQuery::default();
            if let Some(s) = search {
                query = query.with_search(&s);
            }
            let query = query.with_page(page);
            match kind {
                EntityType::Blog => print_sets::<BlogPost>(&client, &query).await?,
                EntityType::FlashcardSet => print_sets::<FlashcardSet>(&client, &query).await?,
                EntityType::QuizSet => print_sets::<QuizSet>(&client, &query).await?,
            }
        }
    }

    Ok(())
}
