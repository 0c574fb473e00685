use clap::{Args, Parser, Subcommand};
use fs_gallery::output::{self, AlbumDetail};
use fs_gallery::{Catalog, config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fs-gallery")]
#[command(about = "Browse a directory tree as a media catalog")]
#[command(long_about = "\
Browse a directory tree as a media catalog

Directories are albums and files are entries. Names carry the metadata:

  gallery/
  ├── foo/
  │   ├── .meta.info           # Album ID sidecar (created on first use)
  │   ├── bar/
  │   │   ├── header.jpg       # Album header image (reserved name)
  │   │   ├── 1_dawn.jpg       # Ordered file, title \"dawn\"
  │   │   ├── 1_dawn_thumb.jpg # Its thumbnail
  │   │   └── dawn_caption.txt # Its caption
  │   ├── bar_caption.txt      # Description of album \"bar\"
  │   ├── _old/                # Archived album (hidden unless --all)
  │   └── featured_s/          # Sticky album

Run 'fs-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Catalog root directory (overrides gallery_root_path)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Shared flag for listings that hide archived albums by default.
#[derive(Args, Clone, Copy)]
struct ArchivedArgs {
    /// Include archived albums
    #[arg(long)]
    all: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Album ID, resolved through the catalog index
    #[arg(long)]
    id: Option<String>,

    /// Album path below the root, joined with the configured delimiter
    #[arg(long)]
    path: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the album tree
    Tree(ArchivedArgs),
    /// Rebuild the catalog index and print it
    Index,
    /// Print one album with its identity and content
    Show(Target),
    /// Print the leaf albums
    Leaves(ArchivedArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut gallery_config = config::load_config(&cli.config)?;
    if let Some(root) = cli.root {
        gallery_config.gallery_root_path = root;
    }
    let catalog = Catalog::open(gallery_config)?;

    match cli.command {
        Command::Tree(args) => {
            let rows = output::collect_tree(catalog.root_album(), args.all)?;
            output::print_tree(&rows);
        }
        Command::Index => {
            let index = catalog.build_index()?;
            output::print_index_table(&index);
        }
        Command::Show(target) => {
            let album = match (target.id, target.path) {
                (Some(id), _) => catalog.album_by_id(&id)?,
                (None, Some(path)) => catalog.album_by_relative_path(&path)?,
                (None, None) => return Err("one of --id or --path is required".into()),
            };
            output::print_album(&AlbumDetail::from_album(&album)?);
        }
        Command::Leaves(args) => {
            let rows = output::collect_leaves(catalog.root_album(), args.all)?;
            output::print_leaves(&rows);
        }
        Command::GenConfig => {}
    }

    Ok(())
}
