//! Speech synthesis and ffmpeg-based assembly: the Speech Synthesizer (C8)
//! and the Audio Assembler (C9).

pub mod assembler;
pub mod error;
pub mod ffmpeg_tool;
pub mod synthesizer;

pub use assembler::AudioAssembler;
pub use error::AudioError;
pub use ffmpeg_tool::FfmpegAudioTool;
pub use synthesizer::{SpeechSynthesizer, VoiceSelector};
