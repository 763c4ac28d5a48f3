//! Gallery post storage
//!
//! Persistent local storage for shared posts: one pretty-printed JSON
//! document per post under `<data_dir>/posts/<id>.json`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// A stored gallery post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub prompt: String,
    pub photo: String,
    pub created_at: String,
}

pub struct PostStore {
    posts_dir: PathBuf,
}

impl PostStore {
    /// Open a store rooted at `data_dir`, creating the posts directory if
    /// needed.
    pub fn new(data_dir: &Path) -> Result<Self, String> {
        let posts_dir = data_dir.join("posts");
        fs::create_dir_all(&posts_dir)
            .map_err(|e| format!("Failed to create posts directory: {}", e))?;
        Ok(Self { posts_dir })
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf, String> {
        let home = dirs::home_dir().ok_or("Could not determine home directory")?;
        Ok(home.join(".artshare"))
    }

    /// Persist a new post and return the stored record.
    pub fn create(&self, name: &str, prompt: &str, photo: &str) -> Result<Post, String> {
        let post = Post {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            prompt: prompt.to_string(),
            photo: photo.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let path = self.posts_dir.join(format!("{}.json", post.id));
        let json = serde_json::to_string_pretty(&post)
            .map_err(|e| format!("Failed to serialize post: {}", e))?;
        fs::write(&path, json).map_err(|e| format!("Failed to write post: {}", e))?;

        info!(post_id = %post.id, author = %post.name, "Post stored");
        Ok(post)
    }

    /// List all posts, newest first. Unreadable documents are skipped with a
    /// warning instead of failing the whole listing.
    pub fn list(&self) -> Result<Vec<Post>, String> {
        let entries = fs::read_dir(&self.posts_dir)
            .map_err(|e| format!("Failed to read posts directory: {}", e))?;

        let mut posts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str::<Post>(&content) {
                    Ok(post) => posts.push(post),
                    Err(e) => warn!("Skipping unreadable post {:?}: {}", path, e),
                },
                Err(e) => warn!("Skipping unreadable post {:?}: {}", path, e),
            }
        }

        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }
}
