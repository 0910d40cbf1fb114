//! World database command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use std::path::{Path, PathBuf};

use isle_wdb::{Lod, ModelData, PartData, Roi, Texture, WdbFile, lod_lookup_name};

use crate::utils::{NodeType, RefType, TreeNode, TreeOptions, read_file, render_tree};

#[derive(Subcommand)]
pub enum WdbCommands {
    /// Display the world catalog and global blocks
    Info {
        /// Path to the WDB file
        file: PathBuf,
    },

    /// Show the ROI tree of every model
    Tree {
        /// Path to the WDB file
        file: PathBuf,

        /// Only show this model
        #[arg(long)]
        model: Option<String>,

        /// Maximum depth to display
        #[arg(long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List global and per-model textures
    Textures {
        /// Path to the WDB file
        file: PathBuf,
    },
}

pub fn execute(command: WdbCommands) -> Result<()> {
    match command {
        WdbCommands::Info { file } => execute_info(file),
        WdbCommands::Tree {
            file,
            model,
            depth,
            no_color,
        } => execute_tree(file, model, depth, no_color),
        WdbCommands::Textures { file } => execute_textures(file),
    }
}

fn load(path: &Path) -> Result<(Vec<u8>, WdbFile)> {
    let data = read_file(path)?;
    let wdb = WdbFile::parse(&data)
        .with_context(|| format!("Failed to parse WDB file: {}", path.display()))?;
    Ok((data, wdb))
}

fn execute_info(path: PathBuf) -> Result<()> {
    let (data, wdb) = load(&path)?;

    println!("WDB File Information");
    println!("====================");
    println!("File: {}", style(path.display()).cyan());
    println!("Size: {} bytes", data.len());
    println!("Worlds: {}", wdb.worlds.len());
    println!("Models: {}", wdb.model_count());
    println!("Parts: {}", wdb.part_count());
    println!("Global textures: {}", wdb.global_textures.len());
    match &wdb.global_parts {
        Some(parts) => println!(
            "Global parts: {} ROIs, {} textures",
            parts.rois.len(),
            parts.textures.len()
        ),
        None => println!("Global parts: none"),
    }

    for world in &wdb.worlds {
        println!();
        println!("{}", style(&world.name).bold().yellow());
        for part in &world.parts {
            println!(
                "  part  {:<24} {:>8} bytes @ {:#x}",
                part.name, part.data_length, part.data_offset
            );
        }
        for model in &world.models {
            let visibility = if model.visible { "" } else { " (hidden)" };
            println!(
                "  model {:<24} {:>8} bytes @ {:#x}  {}{}",
                model.name, model.data_length, model.data_offset, model.presenter, visibility
            );
        }
    }

    Ok(())
}

fn execute_tree(
    path: PathBuf,
    model_filter: Option<String>,
    depth: Option<usize>,
    no_color: bool,
) -> Result<()> {
    let (data, wdb) = load(&path)?;

    if let Some(name) = &model_filter
        && wdb.find_model(name).is_none()
    {
        anyhow::bail!("Model '{}' not found", name);
    }

    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let mut root = TreeNode::new(file_name, NodeType::Root)
        .with_size(data.len() as u64)
        .with_metadata("worlds", wdb.worlds.len());

    for world in &wdb.worlds {
        let mut world_node = TreeNode::new(&world.name, NodeType::World);
        for model in &world.models {
            if let Some(name) = &model_filter
                && !model.name.eq_ignore_ascii_case(name)
            {
                continue;
            }
            let block = ModelData::read_from(&data, model)
                .with_context(|| format!("Failed to read model '{}'", model.name))?;
            let known = |name: &str| {
                block
                    .textures
                    .iter()
                    .chain(&wdb.global_textures)
                    .any(|texture| texture.name.eq_ignore_ascii_case(name))
            };
            let mut model_node = TreeNode::new(&model.name, NodeType::Model)
                .with_size(u64::from(model.data_length))
                .with_metadata("presenter", &model.presenter)
                .with_metadata("location", format!("{:?}", model.transform.location))
                .with_metadata("textures", block.textures.len());
            if !block.animation.actors.is_empty() {
                model_node = model_node.add_child(animation_node(&block));
            }
            model_node = model_node.add_child(roi_node(&wdb, &block.roi, &known));
            for texture in &block.textures {
                model_node = model_node.add_child(
                    TreeNode::new(&texture.name, NodeType::Texture)
                        .with_metadata("size", format!("{}x{}", texture.width(), texture.height()))
                        .with_metadata("hi-res", texture.hi_res),
                );
            }
            world_node = world_node.add_child(model_node);
        }

        if model_filter.is_none() {
            for part in &world.parts {
                let block = PartData::read_from(&data, part)
                    .with_context(|| format!("Failed to read part '{}'", part.name))?;
                world_node = world_node.add_child(part_node(&part.name, part.data_length, &block));
            }
        }
        root = root.add_child(world_node);
    }

    if model_filter.is_none()
        && let Some(parts) = &wdb.global_parts
    {
        root = root.add_child(part_node("global parts", 0, parts));
    }

    let options = TreeOptions {
        max_depth: depth,
        no_color,
        ..Default::default()
    };
    print!("{}", render_tree(&root, &options));
    Ok(())
}

fn animation_node(block: &ModelData) -> TreeNode {
    let clip = &block.animation;
    let mut node = TreeNode::new("animation", NodeType::Animation)
        .with_metadata("duration", clip.duration)
        .with_metadata("nodes", clip.root.node_count());
    for actor in &clip.actors {
        node = node.with_external_ref(&actor.name, RefType::Actor, None);
    }
    node
}

fn roi_node(wdb: &WdbFile, roi: &Roi, known_texture: &dyn Fn(&str) -> bool) -> TreeNode {
    let mut node = TreeNode::new(&roi.name, NodeType::Roi)
        .with_metadata("radius", roi.bounding_sphere.radius);

    if roi.shared_lod_list {
        let lookup = lod_lookup_name(&roi.name);
        node = node.with_external_ref(
            lookup,
            RefType::SharedLods,
            Some(wdb.resolve_lods(roi).is_some()),
        );
    } else {
        for (index, lod) in roi.lods.iter().enumerate() {
            node = node.add_child(lod_node(index, lod));
        }
    }

    if let Some(texture) = &roi.texture_name {
        node = node.with_external_ref(texture, RefType::Texture, Some(known_texture(texture)));
    }
    for child in &roi.children {
        node = node.add_child(roi_node(wdb, child, known_texture));
    }
    node
}

fn lod_node(index: usize, lod: &Lod) -> TreeNode {
    let mut node = TreeNode::new(format!("lod {index}"), NodeType::Lod)
        .with_metadata("vertices", lod.vertices.len())
        .with_metadata("meshes", lod.meshes.len())
        .with_metadata("triangles", lod.triangle_count());
    for mesh in &lod.meshes {
        if let Some(texture) = &mesh.properties.texture_name {
            node = node.with_external_ref(texture, RefType::Texture, None);
        }
    }
    node
}

fn part_node(name: &str, size: u32, block: &PartData) -> TreeNode {
    let mut node = TreeNode::new(name, NodeType::Part).with_metadata("textures", block.textures.len());
    if size > 0 {
        node = node.with_size(u64::from(size));
    }
    for roi in &block.rois {
        let mut roi_node = TreeNode::new(&roi.name, NodeType::Roi);
        for (index, lod) in roi.lods.iter().enumerate() {
            roi_node = roi_node.add_child(lod_node(index, lod));
        }
        node = node.add_child(roi_node);
    }
    node
}

fn execute_textures(path: PathBuf) -> Result<()> {
    let (data, wdb) = load(&path)?;

    println!("{}", style("Global textures").bold());
    print_textures(&wdb.global_textures);

    if let Some(parts) = &wdb.global_parts {
        println!();
        println!("{}", style("Global part textures").bold());
        print_textures(&parts.textures);
    }

    for world in &wdb.worlds {
        for model in &world.models {
            let block = ModelData::read_from(&data, model)
                .with_context(|| format!("Failed to read model '{}'", model.name))?;
            if block.textures.is_empty() {
                continue;
            }
            println!();
            println!("{} / {}", style(&world.name).bold(), style(&model.name).green());
            print_textures(&block.textures);
        }
    }
    Ok(())
}

fn print_textures(textures: &[Texture]) {
    if textures.is_empty() {
        println!("  (none)");
    }
    for texture in textures {
        let marker = if texture.hi_res { " [hi-res]" } else { "" };
        println!(
            "  {:<24} {:>4}x{:<4} {:>3} colors{}",
            texture.name,
            texture.width(),
            texture.height(),
            texture.image.palette.len(),
            marker
        );
    }
}
