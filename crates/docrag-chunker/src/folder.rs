//! Folder scanning: walk, extract, pool, chunk.
//!
//! Files are visited in the order the filesystem yields them. That order is
//! not sorted, so chunk boundaries are only reproducible for a fixed folder
//! snapshot on a fixed filesystem.

use docrag_core::{ChunkError, Document};
use docrag_extract::ExtractorRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::WordChunker;

/// Turns a folder of documents into an ordered chunk sequence.
pub struct FolderChunker {
    registry: Arc<ExtractorRegistry>,
    chunker: WordChunker,
}

impl FolderChunker {
    /// Create a folder chunker over the given extractors.
    pub fn new(registry: Arc<ExtractorRegistry>, chunker: WordChunker) -> Self {
        Self { registry, chunker }
    }

    /// Folder chunker with the default extractors and the given window size.
    pub fn with_chunk_size(chunk_size: usize) -> Result<Self, ChunkError> {
        Ok(Self::new(
            Arc::new(ExtractorRegistry::with_defaults()),
            WordChunker::new(chunk_size)?,
        ))
    }

    /// The word chunker in use.
    #[must_use]
    pub fn chunker(&self) -> &WordChunker {
        &self.chunker
    }

    /// Extract every supported file under `root`.
    ///
    /// Files that yield no text are logged and left out; their failure never
    /// affects siblings.
    pub async fn collect_documents(&self, root: &Path) -> Result<Vec<Document>, ChunkError> {
        info!("Scanning folder: {:?}", root);

        let paths = self.supported_files(root).await?;
        let mut documents = Vec::with_capacity(paths.len());

        for path in paths {
            match self.registry.extract_text(&path).await {
                Some(text) if !text.is_empty() => documents.push(Document::new(path, text)),
                _ => warn!("No text extracted from {:?}", path),
            }
        }

        Ok(documents)
    }

    /// Walk, extract and chunk `root`.
    ///
    /// An empty result is not an error: it means no file yielded text.
    pub async fn chunk_folder(&self, root: &Path) -> Result<Vec<String>, ChunkError> {
        let documents = self.collect_documents(root).await?;

        let mut pool = String::new();
        for document in &documents {
            pool.push_str(&document.text);
            pool.push(' ');
        }

        if pool.is_empty() {
            warn!("No text found in any documents under {:?}", root);
            return Ok(vec![]);
        }

        let chunks = self.chunker.chunk(&pool);
        info!(
            "Total chunks created: {} with chunk_size={} from {} document(s)",
            chunks.len(),
            self.chunker.chunk_size(),
            documents.len()
        );
        Ok(chunks)
    }

    /// Recursively list files whose extension some extractor supports.
    async fn supported_files(&self, root: &Path) -> Result<Vec<PathBuf>, ChunkError> {
        if !root.is_dir() {
            return Err(ChunkError::InvalidRoot(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let root = root.to_path_buf();
        let registry = Arc::clone(&self.registry);

        // Directory walking is blocking I/O
        tokio::task::spawn_blocking(move || walk_supported(&root, &registry))
            .await
            .map_err(|e| ChunkError::InvalidRoot(format!("scan task failed: {e}")))
    }
}

fn walk_supported(root: &Path, registry: &ExtractorRegistry) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read directory entry: {}", e);
                continue;
            }
        };

        // Symlinked files are read; symlinked directories are not descended.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());

        if is_file && registry.is_supported(entry.path()) {
            paths.push(entry.into_path());
        } else {
            debug!("Skipping {:?}", entry.path());
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sorted_words(chunks: &[String]) -> Vec<String> {
        let mut words: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.split(' ').map(str::to_string))
            .collect();
        words.sort();
        words
    }

    #[tokio::test]
    async fn test_single_file_chunks() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "one two three\nfour five").unwrap();

        let chunker = FolderChunker::with_chunk_size(2).unwrap();
        let chunks = chunker.chunk_folder(dir.path()).await.unwrap();

        assert_eq!(chunks, vec!["one two", "three four", "five"]);
    }

    #[tokio::test]
    async fn test_recursive_walk_pools_all_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("sub").join("deeper");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha beta").unwrap();
        std::fs::write(nested.join("b.TXT"), "gamma delta epsilon").unwrap();

        let chunker = FolderChunker::with_chunk_size(200).unwrap();
        let chunks = chunker.chunk_folder(dir.path()).await.unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            sorted_words(&chunks),
            vec!["alpha", "beta", "delta", "epsilon", "gamma"]
        );
    }

    #[tokio::test]
    async fn test_unsupported_and_empty_files_skipped() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("keep.txt"), "kept words").unwrap();
        std::fs::write(dir.path().join("notes.md"), "markdown is ignored").unwrap();
        std::fs::write(dir.path().join("empty.txt"), "").unwrap();

        let chunker = FolderChunker::with_chunk_size(10).unwrap();
        let documents = chunker.collect_documents(dir.path()).await.unwrap();
        let chunks = chunker.chunk_folder(dir.path()).await.unwrap();

        assert_eq!(documents.len(), 1);
        assert!(documents[0].path.ends_with("keep.txt"));
        assert_eq!(chunks, vec!["kept words"]);
    }

    #[tokio::test]
    async fn test_corrupted_file_does_not_abort_siblings() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"not a pdf").unwrap();
        std::fs::write(dir.path().join("broken.docx"), b"not a docx").unwrap();
        std::fs::write(dir.path().join("good.txt"), "still here").unwrap();

        let chunker = FolderChunker::with_chunk_size(5).unwrap();
        let chunks = chunker.chunk_folder(dir.path()).await.unwrap();

        assert_eq!(chunks, vec!["still here"]);
    }

    #[tokio::test]
    async fn test_folder_without_text_yields_no_chunks() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("blank.txt"), "").unwrap();
        std::fs::write(dir.path().join("image.png"), [0u8; 8]).unwrap();

        let chunker = FolderChunker::with_chunk_size(5).unwrap();

        assert!(chunker.chunk_folder(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_only_text_yields_no_chunks() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("spaces.txt"), "   \n\n  ").unwrap();

        let chunker = FolderChunker::with_chunk_size(5).unwrap();

        assert!(chunker.chunk_folder(dir.path()).await.unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_file_is_read_but_symlinked_dir_is_not_walked() {
        let outside = tempdir().unwrap();
        std::fs::write(outside.path().join("linked.txt"), "linked words").unwrap();
        std::fs::create_dir(outside.path().join("elsewhere")).unwrap();
        std::fs::write(outside.path().join("elsewhere/hidden.txt"), "hidden words").unwrap();

        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("local.txt"), "local words").unwrap();
        std::os::unix::fs::symlink(outside.path().join("linked.txt"), dir.path().join("link.txt"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("elsewhere"), dir.path().join("subdir"))
            .unwrap();

        let chunker = FolderChunker::with_chunk_size(50).unwrap();
        let chunks = chunker.chunk_folder(dir.path()).await.unwrap();

        assert_eq!(
            sorted_words(&chunks),
            vec!["linked", "local", "words", "words"]
        );
    }

    #[tokio::test]
    async fn test_missing_root_is_error() {
        let chunker = FolderChunker::with_chunk_size(5).unwrap();
        let result = chunker
            .chunk_folder(Path::new("/definitely/not/here"))
            .await;
        assert!(matches!(result, Err(ChunkError::InvalidRoot(_))));
    }

    #[tokio::test]
    async fn test_file_root_is_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let chunker = FolderChunker::with_chunk_size(5).unwrap();

        assert!(chunker.chunk_folder(&file).await.is_err());
    }

    #[test]
    fn test_with_chunk_size_rejects_zero() {
        assert!(FolderChunker::with_chunk_size(0).is_err());
    }
}
