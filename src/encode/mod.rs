/// `ffmpeg`-backed transcoder.
pub mod ffmpeg;
/// Frame sink contract and in-memory sink.
pub mod sink;
/// Transcoder contract and output formats.
pub mod transcode;
/// YUV4MPEG2 capture container.
pub mod y4m;
