//! Google Gemini dialect (`generateContent`)

pub(crate) mod conversion;
pub(crate) mod types;

#[cfg(test)]
mod tests;
