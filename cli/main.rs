use clap::{Parser, Subcommand};
use maskpair::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "maskpair")]
#[command(about = "Manage stored original/mask image pairs", long_about = None)]
pub struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:maskpair.db")]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a new pair
    Upload {
        #[arg(help = "Path to the original image")]
        original: PathBuf,

        #[arg(help = "Path to the mask image")]
        mask: PathBuf,
    },
    /// List every pair, newest first
    List,
    /// Show one pair
    Show { id: String },
    /// Write both images of a pair into a directory
    Export {
        id: String,

        #[arg(help = "Directory to write original.<ext> and mask.<ext> into")]
        dir: PathBuf,
    },
    /// Delete one pair
    Remove { id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("failed to open database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored image is corrupt: {0}")]
    Encoding(#[from] EncodingError),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let db = Database::with_migration(connect(&cli.database_url).await?).await?;

    match cli.command {
        Commands::Upload { original, mask } => {
            let pair = UploadPairCommand::new()
                .with_original(read_upload(&original).await?)
                .with_mask(read_upload(&mask).await?)
                .execute(&db)
                .await?;

            println!("{}", pair.id);
        }
        Commands::List => {
            for pair in list_pairs(&db).await? {
                println!("{}", summary_line(&pair)?);
            }
        }
        Commands::Show { id } => {
            let pair = find_pair(&db, &id).await?;
            let original = DataUri::parse(&pair.original_image)?;
            let mask = DataUri::parse(&pair.mask_image)?;

            println!("id:         {}", pair.id);
            println!("created_at: {}", pair.created_at.format(TIMESTAMP_FORMAT));
            println!(
                "original:   {} ({} bytes)",
                original.content_type,
                original.bytes.len()
            );
            println!("mask:       {} ({} bytes)", mask.content_type, mask.bytes.len());
        }
        Commands::Export { id, dir } => {
            let pair = find_pair(&db, &id).await?;

            for path in export_pair(&pair, &dir).await? {
                println!("{}", path.display());
            }
        }
        Commands::Remove { id } => {
            remove_pair(&db, &id).await?;
            println!("removed {id}");
        }
    }

    Ok(())
}

/// Reads a file and sniffs its content type from the leading bytes.
async fn read_upload(path: &Path) -> Result<Upload, CliError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_CONTENT_TYPE);

    Ok(Upload::new(bytes).with_content_type(content_type))
}

fn summary_line(pair: &ImagePair) -> Result<String, CliError> {
    let original = DataUri::parse(&pair.original_image)?;
    let mask = DataUri::parse(&pair.mask_image)?;

    Ok(format!(
        "{}  {}  {}  {}",
        pair.id,
        pair.created_at.format(TIMESTAMP_FORMAT),
        original.content_type,
        mask.content_type
    ))
}

/// Decodes both images of `pair` into `dir`, returning the written paths.
async fn export_pair(pair: &ImagePair, dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| CliError::Io { path, source }
    };

    tokio::fs::create_dir_all(dir).await.map_err(io_err(dir))?;

    let mut written = vec![];
    for (stem, uri) in [("original", &pair.original_image), ("mask", &pair.mask_image)] {
        let image = DataUri::parse(uri)?;
        let path = dir.join(format!("{stem}.{}", image.extension().unwrap_or("bin")));

        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(io_err(&path))?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::{export_pair, read_upload, summary_line};
    use maskpair::prelude::*;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn pair() -> ImagePair {
        NewImagePair {
            original_image: encode_data_uri(PNG_HEADER, "image/png"),
            mask_image: encode_data_uri(b"raw mask", FALLBACK_CONTENT_TYPE),
        }
        .into_pair()
    }

    #[tokio::test]
    async fn test_read_upload_sniffs_type() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("a.png");
        let other = dir.path().join("b.dat");
        std::fs::write(&png, PNG_HEADER).unwrap();
        std::fs::write(&other, b"plain bytes").unwrap();

        let upload = read_upload(&png).await.unwrap();
        assert_eq!(Some("image/png"), upload.content_type.as_deref());
        assert_eq!(PNG_HEADER, &upload.bytes[..]);

        let upload = read_upload(&other).await.unwrap();
        assert_eq!(Some(FALLBACK_CONTENT_TYPE), upload.content_type.as_deref());
    }

    #[tokio::test]
    async fn test_read_upload_missing_file() {
        let dir = TempDir::new().unwrap();

        assert!(read_upload(&dir.path().join("missing.png")).await.is_err());
    }

    #[tokio::test]
    async fn test_export_pair() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested");

        let written = export_pair(&pair(), &out).await.unwrap();

        assert_eq!(vec![out.join("original.png"), out.join("mask.bin")], written);
        assert_eq!(PNG_HEADER, std::fs::read(&written[0]).unwrap().as_slice());
        assert_eq!(b"raw mask".as_slice(), std::fs::read(&written[1]).unwrap().as_slice());
    }

    #[test]
    fn test_summary_line() {
        let pair = pair();
        let line = summary_line(&pair).unwrap();

        assert!(line.starts_with(&pair.id.to_string()));
        assert!(line.ends_with("image/png  application/octet-stream"));
    }
}
