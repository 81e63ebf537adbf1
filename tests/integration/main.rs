//! Integration tests for wallpipe


mod cache_test;
mod cli_test;
mod codec_test;
mod dispatch_test;
