//! Local feature-hashing embedder. Deterministic, offline, no model download.
//!
//! Each comma-separated skill contributes its whole lowercased phrase plus its individual
//! words, hashed (FNV-1a) into a fixed number of buckets. Vectors are L2-normalized so
//! cosine similarity reduces to overlap between skill vocabularies.

use crate::domain::DomainError;
use crate::ports::EmbeddingPort;

pub const DEFAULT_DIM: usize = 256;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];

        for phrase in text.split(',') {
            let phrase = phrase.trim().to_lowercase();
            if phrase.is_empty() {
                continue;
            }
            // Whole phrase weighs more than its parts: "machine learning" != "machine" + "learning".
            v[self.bucket(&phrase)] += 2.0;

            let words: Vec<&str> = phrase
                .split(|c: char| c.is_whitespace() || c == '/' || c == '-')
                .filter(|w| !w.is_empty())
                .collect();
            if words.len() > 1 {
                for w in words {
                    v[self.bucket(w)] += 1.0;
                }
            }
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }

    fn bucket(&self, token: &str) -> usize {
        (fnv1a(token.as_bytes()) % self.dim as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait::async_trait]
impl EmbeddingPort for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
