//! # Result Parsing Module
//!
//! Questo modulo interpreta la riga di stato emessa dallo script esterno.
//!
//! ## Responsabilità:
//! - Parsing totale: ogni stringa (anche vuota) produce esattamente un
//!   `CompressionOutcome`, mai un errore
//! - Ricalcola la percentuale di riduzione invece di fidarsi del tool
//! - Rende la grammatica in senso inverso con `status_line()`
//!
//! ## Grammatica della riga di stato (versionata, separatore `:`):
//! ```text
//! EXITO:<originalBytes>:<compressedBytes>:<reductionPercent>:<tierUsed>
//! ADVERTENCIA:<originalBytes>:<compressedBytes>:0:<tierUsed>:<reasonText>
//! ERROR:<message>
//! ```
//!
//! Qualsiasi altro prefisso (o input vuoto) è un `Failure` con la stringa
//! grezza come messaggio. Il lato esterno della grammatica non è sotto il
//! nostro controllo, quindi il parsing è difensivo: campi numerici non
//! parsabili diventano 0, tier sconosciuti diventano Advanced.

use crate::config::CompressionTier;

/// Structured outcome of one compression invocation. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub enum CompressionOutcome {
    /// The output file is smaller than the input
    Success {
        original_bytes: u64,
        compressed_bytes: u64,
        reduction_percent: f64,
        tier: CompressionTier,
    },
    /// Compression ran but the output is not smaller than the input
    Ineffective {
        original_bytes: u64,
        compressed_bytes: u64,
        reduction_percent: f64,
        tier: CompressionTier,
        reason: String,
    },
    /// The invocation could not run or reported an unrecoverable error
    Failure { message: String },
}

impl CompressionOutcome {
    /// Parse a raw status line into an outcome. Total over all inputs.
    pub fn parse(raw: &str) -> Self {
        let line = raw.trim();
        let parts: Vec<&str> = line.split(':').collect();

        match parts[0] {
            "EXITO" if parts.len() >= 5 => {
                let original_bytes = parts[1].parse::<u64>().unwrap_or(0);
                let compressed_bytes = parts[2].parse::<u64>().unwrap_or(0);
                let tier = CompressionTier::from_wire_token(parts[4]);

                Self::Success {
                    original_bytes,
                    compressed_bytes,
                    reduction_percent: Self::recompute_reduction(
                        original_bytes,
                        compressed_bytes,
                    ),
                    tier,
                }
            }
            "ADVERTENCIA" => {
                let original_bytes =
                    parts.get(1).and_then(|p| p.parse::<u64>().ok()).unwrap_or(0);
                let compressed_bytes =
                    parts.get(2).and_then(|p| p.parse::<u64>().ok()).unwrap_or(0);
                let tier = parts
                    .get(4)
                    .map(|t| CompressionTier::from_wire_token(t))
                    .unwrap_or(CompressionTier::Advanced);
                // The reason may itself contain colons; anything before the
                // expected field count falls back to the whole line.
                let reason = if parts.len() > 5 {
                    parts[5..].join(":")
                } else {
                    line.to_string()
                };

                // The wire grammar fixes this field at 0; clamp the
                // recomputed value so an ineffective outcome never claims
                // a positive saving, whatever the byte counts say.
                Self::Ineffective {
                    original_bytes,
                    compressed_bytes,
                    reduction_percent: Self::recompute_reduction(
                        original_bytes,
                        compressed_bytes,
                    )
                    .min(0.0),
                    tier,
                    reason,
                }
            }
            _ => Self::Failure {
                message: raw.to_string(),
            },
        }
    }

    /// The upstream tool reports its own arithmetic; tolerate it but do not
    /// rely on it.
    fn recompute_reduction(original_bytes: u64, compressed_bytes: u64) -> f64 {
        if original_bytes > 0 {
            100.0 - (compressed_bytes as f64 / original_bytes as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Render the outcome back into the line grammar
    pub fn status_line(&self) -> String {
        match self {
            Self::Success {
                original_bytes,
                compressed_bytes,
                reduction_percent,
                tier,
            } => format!(
                "EXITO:{}:{}:{:.2}:{}",
                original_bytes,
                compressed_bytes,
                reduction_percent,
                tier.wire_token()
            ),
            Self::Ineffective {
                original_bytes,
                compressed_bytes,
                tier,
                reason,
                ..
            } => format!(
                "ADVERTENCIA:{}:{}:0:{}:{}",
                original_bytes,
                compressed_bytes,
                tier.wire_token(),
                reason
            ),
            Self::Failure { message } => message.clone(),
        }
    }
}
