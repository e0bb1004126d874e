//! Browser file picker for gravel textures and plant models
//!
//! A hidden `<input type="file">` is created per request. The selected file
//! is read into memory by a `FileReader` callback and queued; the queue is
//! drained every frame into `AssetPicked` messages. Cancelled selections
//! queue nothing.

use aquarium_core::AssetKind;
use aquarium_scene::{AssetPicked, EditorStatus};
use bevy::prelude::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// File picker plugin
pub struct FilePickerPlugin;

impl Plugin for FilePickerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingFileResults>()
            .add_systems(Update, process_file_results);
    }
}

/// Result from a file picker operation
#[derive(Debug, Clone)]
pub struct FilePickerResult {
    /// The asset slot this file was picked for
    pub kind: AssetKind,
    /// Filename (without path)
    pub filename: String,
    /// File content, when the read succeeded
    pub content: Option<Vec<u8>>,
    /// Error message if failed
    pub error: Option<String>,
}

/// Pending file results from JavaScript callbacks
#[derive(Resource, Default, Clone)]
pub struct PendingFileResults(pub Arc<Mutex<VecDeque<FilePickerResult>>>);

/// Move results from the JS callback queue into the scene as messages
fn process_file_results(
    pending: Res<PendingFileResults>,
    mut picked: MessageWriter<AssetPicked>,
    mut status: ResMut<EditorStatus>,
) {
    let Ok(mut pending_results) = pending.0.lock() else {
        return;
    };
    while let Some(result) = pending_results.pop_front() {
        match (result.content, result.error) {
            (Some(bytes), _) => {
                picked.write(AssetPicked {
                    kind: result.kind,
                    filename: result.filename,
                    bytes,
                });
            }
            (None, Some(error)) => {
                tracing::warn!(kind = %result.kind, error = %error, "File pick failed");
                status.error(error);
            }
            (None, None) => {}
        }
    }
}

// ============================================================================
// JavaScript Interop (WASM only)
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod js_interop {
    use super::*;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{FileReader, HtmlInputElement};

    fn push_result(pending: &Arc<Mutex<VecDeque<FilePickerResult>>>, result: FilePickerResult) {
        if let Ok(mut results) = pending.lock() {
            results.push_back(result);
        }
    }

    fn read_file(
        file: web_sys::File,
        kind: AssetKind,
        pending: Arc<Mutex<VecDeque<FilePickerResult>>>,
    ) {
        let filename = file.name();
        let reader = match FileReader::new() {
            Ok(reader) => reader,
            Err(e) => {
                tracing::error!("read_file: failed to create FileReader: {:?}", e);
                return;
            }
        };
        let reader_clone = reader.clone();

        let onload = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let content = reader_clone
                .result()
                .ok()
                .and_then(|result| result.dyn_into::<js_sys::ArrayBuffer>().ok())
                .map(|buffer| js_sys::Uint8Array::new(&buffer).to_vec());

            let result = match content {
                Some(content) => FilePickerResult {
                    kind,
                    filename: filename.clone(),
                    content: Some(content),
                    error: None,
                },
                None => FilePickerResult {
                    kind,
                    filename: filename.clone(),
                    content: None,
                    error: Some(format!("Could not read {}", filename)),
                },
            };
            push_result(&pending, result);
        }) as Box<dyn FnMut(_)>);

        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        if let Err(e) = reader.read_as_array_buffer(&file) {
            tracing::error!("read_file: read_as_array_buffer failed: {:?}", e);
        }
    }

    /// Open a file picker dialog using a hidden HTML input element
    pub fn open_file_picker(
        accept: &str,
        pending_results: Arc<Mutex<VecDeque<FilePickerResult>>>,
        kind: AssetKind,
    ) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            tracing::error!("open_file_picker: no document object");
            return;
        };

        let input: HtmlInputElement = match document
            .create_element("input")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            Some(input) => input,
            None => {
                tracing::error!("open_file_picker: failed to create file input");
                return;
            }
        };

        input.set_type("file");
        input.set_accept(accept);
        input.style().set_property("display", "none").ok();

        let Some(body) = document.body() else {
            tracing::error!("open_file_picker: no document body");
            return;
        };
        if let Err(e) = body.append_child(&input) {
            tracing::error!("open_file_picker: failed to append input to body: {:?}", e);
            return;
        }

        let input_clone = input.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            // An empty selection leaves the slot untouched
            if let Some(file) = input_clone.files().and_then(|files| files.get(0)) {
                read_file(file, kind, pending_results.clone());
            }

            if let Some(parent) = input_clone.parent_node() {
                parent.remove_child(&input_clone).ok();
            }
        }) as Box<dyn FnMut(_)>);

        input.set_onchange(Some(closure.as_ref().unchecked_ref()));
        closure.forget();

        input.click();
    }
}

// Non-WASM stubs
#[cfg(not(target_arch = "wasm32"))]
mod js_interop {
    use super::*;

    pub fn open_file_picker(
        _accept: &str,
        pending_results: Arc<Mutex<VecDeque<FilePickerResult>>>,
        kind: AssetKind,
    ) {
        if let Ok(mut results) = pending_results.lock() {
            results.push_back(FilePickerResult {
                kind,
                filename: String::new(),
                content: None,
                error: Some("File picker not supported on this platform".to_string()),
            });
        }
    }
}

pub use js_interop::open_file_picker;

/// Helper to trigger file open from UI
pub fn trigger_file_open(pending: &PendingFileResults, kind: AssetKind) {
    let accept = kind.accept_string();
    tracing::debug!(accept = %accept, kind = %kind, "Opening file picker");
    open_file_picker(&accept, pending.0.clone(), kind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_picker_reports_unsupported() {
        let pending = PendingFileResults::default();
        trigger_file_open(&pending, AssetKind::PlantModel);

        let results = pending.0.lock().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, AssetKind::PlantModel);
        assert!(results[0].content.is_none());
        assert!(results[0].error.is_some());
    }
}
