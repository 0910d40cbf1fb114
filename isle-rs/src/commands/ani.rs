//! Animation clip command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use std::path::{Path, PathBuf};

use isle_ani::AnimationClip;

use crate::utils::{NodeType, RefType, TreeNode, TreeOptions, read_file, render_tree};

#[derive(Subcommand)]
pub enum AniCommands {
    /// Display information about an animation file
    Info {
        /// Path to the .ani file
        file: PathBuf,
    },

    /// Show the animation node tree
    Tree {
        /// Path to the .ani file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

pub fn execute(command: AniCommands) -> Result<()> {
    match command {
        AniCommands::Info { file } => execute_info(&file),
        AniCommands::Tree {
            file,
            depth,
            no_color,
        } => execute_tree(&file, depth, no_color),
    }
}

fn load(path: &Path) -> Result<AnimationClip> {
    let data = read_file(path)?;
    AnimationClip::parse(&data)
        .with_context(|| format!("Failed to parse animation: {}", path.display()))
}

fn execute_info(path: &Path) -> Result<()> {
    let clip = load(path)?;

    println!("Animation Information");
    println!("=====================");
    println!("File: {}", style(path.display()).cyan());
    if let Some(header) = &clip.header {
        println!("Bounding radius: {}", header.bounding_radius);
        println!("Center: {:?}", header.center);
    }
    println!("Duration: {} ms", clip.duration);
    println!("Nodes: {}", clip.root.node_count());
    println!("Keys: {}", clip.root.key_count());

    println!("Actors: {}", clip.actors.len());
    for actor in &clip.actors {
        let placeholder = if actor.is_placeholder() {
            " (placeholder)"
        } else {
            ""
        };
        println!("  {} type {}{}", actor.name, actor.actor_type, placeholder);
    }

    match &clip.camera {
        Some(camera) => println!(
            "Camera: {} position, {} target, {} roll keys",
            camera.translation_keys.len(),
            camera.target_keys.len(),
            camera.rotation_keys.len()
        ),
        None => println!("Camera: none"),
    }
    Ok(())
}

fn execute_tree(path: &Path, depth: Option<usize>, no_color: bool) -> Result<()> {
    let clip = load(path)?;

    let mut root = TreeNode::new(path.display().to_string(), NodeType::Root)
        .with_metadata("duration", clip.duration);
    for actor in &clip.actors {
        root = root.with_external_ref(&actor.name, RefType::Actor, None);
    }
    root = root.add_child(node_tree(&clip.root));

    let options = TreeOptions {
        max_depth: depth,
        no_color,
        ..Default::default()
    };
    print!("{}", render_tree(&root, &options));
    Ok(())
}

fn node_tree(node: &isle_ani::TreeNode) -> TreeNode {
    let name = node.name.as_deref().unwrap_or("(unnamed)");
    let mut out = TreeNode::new(name, NodeType::Animation);
    for (kind, count) in [
        ("translation", node.translation_keys.len()),
        ("rotation", node.rotation_keys.len()),
        ("scale", node.scale_keys.len()),
        ("morph", node.morph_keys.len()),
    ] {
        if count > 0 {
            out = out.with_metadata(kind, count);
        }
    }
    for child in &node.children {
        out = out.add_child(node_tree(child));
    }
    out
}
