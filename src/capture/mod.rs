//! Screen capture domain — public API.
//!
//! Window lookup, raw window capture, cropping, and persistence of
//! finished frames. External code should only use the items exported here.

mod encode;
mod region;
mod screenshot;
mod window;

pub use encode::{
    copy_to_clipboard, default_output_path, encode_png, encode_png_base64, save_frame, EncodeError,
};
pub use region::{crop_frame, CropError, Region};
pub use screenshot::{CaptureError, FrameSource, XcapFrameSource};
pub use window::{
    find_window, list_windows, select_window, WindowHandle, WindowInfo, WindowSelector,
};
