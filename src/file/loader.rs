//! Loading YAML text from files or stdin.
//!
//! The loader only produces the text buffer. The returned `String` is the
//! single owner of the bytes; build a [`Config`](crate::document::tree::Config)
//! over a borrow of it and keep it alive for as long as the tree is used.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reads a text file, gunzipping it first if the name ends in `.gz`.
///
/// # Examples
///
/// ```no_run
/// use devtree::document::tree::Config;
/// use devtree::file::loader::load_text_file;
///
/// let text = load_text_file("board.yaml").unwrap();
/// let config = Config::from_yaml(&text);
/// println!("root: {}", config.key());
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be read
/// - A `.gz` file is not valid gzip
/// - The contents are not valid UTF-8
pub fn load_text_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path)?
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?
    };

    tracing::debug!(path = %path.display(), bytes = content.len(), gzipped = is_gzipped, "loaded text");
    Ok(content)
}

/// Reads all of stdin, gunzipping it if it starts with the gzip magic bytes.
pub fn load_text_from_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    decode_bytes(buffer)
}

/// Turns raw bytes into text, decompressing gzip data.
pub fn decode_bytes(bytes: Vec<u8>) -> Result<String> {
    if bytes.starts_with(&GZIP_MAGIC) {
        decompress_gzip_bytes(&bytes)
    } else {
        String::from_utf8(bytes).context("Input is not valid UTF-8")
    }
}

fn read_gzipped_file(path: &Path) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open gzipped file {}", path.display()))?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}
