//! SocialSim graph demo. Seeds a small follow graph in Neo4j and reports
//! the separation between two agents

use anyhow::Context;
use clap::Parser;
use socialsim::model::{Follows, SocialAgent};
use socialsim::{
    GraphDriver, Neo4jConfig, Neo4jDriver, NodeRepository, NodeRepositoryOptions,
    RelationshipRepository, RelationshipRepositoryOptions,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "socialsim", version, about = "SocialSim graph repository demo")]
struct Cli {
    /// YAML file with Neo4j connection settings; flags below override it
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Bolt URI
    #[arg(long, env = "NEO4J_URI")]
    uri: Option<String>,

    #[arg(long, env = "NEO4J_USER")]
    user: Option<String>,

    #[arg(long, env = "NEO4J_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Database name (server default when omitted)
    #[arg(long, env = "NEO4J_DATABASE")]
    database: Option<String>,

    /// Maximum hops searched between the first and last agent
    #[arg(long, default_value_t = 6)]
    max_hops: u32,

    /// Remove the seeded agents before exiting
    #[arg(long)]
    cleanup: bool,
}

impl Cli {
    fn neo4j_config(&self) -> anyhow::Result<Neo4jConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Neo4jConfig::from_yaml_str(&yaml)?
            }
            None => Neo4jConfig::default(),
        };

        if let Some(uri) = &self.uri {
            config.uri = uri.clone();
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if let Some(database) = &self.database {
            config.database = Some(database.clone());
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.neo4j_config()?;

    println!("SocialSim Graph v{}", socialsim::version());
    println!("==========================================");

    let driver: Arc<dyn GraphDriver> = Arc::new(
        Neo4jDriver::connect(&config)
            .await
            .context("Failed to connect to Neo4j")?,
    );

    let agents = NodeRepository::<SocialAgent>::new(
        driver.clone(),
        NodeRepositoryOptions::default().with_key_property("Username"),
    )?;
    let follows = RelationshipRepository::<Follows, SocialAgent, SocialAgent>::new(
        driver,
        RelationshipRepositoryOptions::default()
            .with_from_key_property("Username")
            .with_to_key_property("Username"),
    )?;

    let usernames = ["alice", "bob", "carol"];
    let seeded: Vec<SocialAgent> = usernames.iter().map(|name| SocialAgent::new(*name)).collect();
    let created = agents
        .update_batch(
            &seeded
                .iter()
                .map(|agent| (agent.username.clone(), agent.clone()))
                .collect::<Vec<_>>(),
        )
        .await?;
    info!("Seeded {} agent(s)", created.len());

    follows
        .create_batch(&[
            ("alice", "bob", Follows::with_weight(0.9)),
            ("bob", "carol", Follows::new()),
        ])
        .await?;
    println!("✓ alice -> bob -> carol");

    let (first, last) = (usernames[0], usernames[usernames.len() - 1]);
    match follows.degree_of_separation(first, last, cli.max_hops).await? {
        Some(hops) => println!("Degree of separation {} -> {}: {}", first, last, hops),
        None => println!("No path from {} to {} within {} hops", first, last, cli.max_hops),
    }

    let path: Option<Vec<String>> = follows.shortest_path(first, last, cli.max_hops).await?;
    if let Some(path) = path {
        println!("Shortest path: {}", path.join(" -> "));
    }

    if cli.cleanup {
        let removed = agents.delete_batch(&usernames).await?;
        println!("Removed {} agent(s)", removed);
    }

    Ok(())
}
