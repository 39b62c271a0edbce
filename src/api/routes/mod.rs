pub mod conference;
pub mod recording;
