//! File upload component with drag-and-drop, file picker, and preview.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;

use crate::object_url::{ObjectUrl, PreviewSlot};
use crate::source::UploadedImage;

/// Allowed file extensions for image uploads.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

/// Check whether a filename has an allowed image extension.
fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|a| a.eq_ignore_ascii_case(ext))
    })
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Heading shown above the drop zone.
    label: String,
    /// Called with the uploaded image after a successful read.
    on_upload: EventHandler<UploadedImage>,
}

/// A drag-and-drop zone with a file picker button and a preview of the
/// selected image.
///
/// Accepts PNG, JPEG, BMP, and WebP images.  The preview's object URL is
/// released when a new file replaces it and when the component unmounts.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut loaded = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut preview = use_signal(PreviewSlot::default);

    // Shared by the file-picker and drag-and-drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        if !has_allowed_extension(&name) {
            error.set(Some(format!("Unsupported file type: {name}")));
            return;
        }
        match file.read_bytes().await {
            Ok(bytes) => {
                let bytes = bytes.to_vec();
                match ObjectUrl::from_bytes(&bytes, "") {
                    Ok(url) => preview.write().replace(url),
                    Err(e) => {
                        tracing::warn!("preview unavailable: {e}");
                        preview.write().release();
                    }
                }
                let image = UploadedImage::new(name.clone(), bytes);
                loaded.set(Some(match image.dimensions {
                    Some(d) => format!("{name} ({} × {})", d.width, d.height),
                    None => name,
                }));
                error.set(None);
                props.on_upload.call(image);
            }
            Err(e) => {
                error.set(Some(format!("Failed to read file: {e}")));
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let border_class = if dragging() {
        "border-[var(--border-accent)] bg-[var(--surface-active)]"
    } else {
        "border-[var(--border-muted)] bg-[var(--surface)]"
    };
    let preview_url = preview.read().url().map(str::to_owned);

    rsx! {
        div { class: "space-y-2",
            h3 { class: "text-sm font-semibold text-[var(--text-heading)]", "{props.label}" }

            div {
                class: "border-2 border-dashed rounded-lg p-6 text-center transition-colors {border_class}",
                ondragover: move |evt| {
                    evt.prevent_default();
                    dragging.set(true);
                },
                ondragleave: move |_| {
                    dragging.set(false);
                },
                ondrop: handle_drop,

                if let Some(ref url) = preview_url {
                    img {
                        src: "{url}",
                        class: "mx-auto mb-3 max-h-48 rounded object-contain",
                        alt: "Selected image",
                    }
                }

                if let Some(ref name) = loaded() {
                    p { class: "text-[var(--text-success)] mb-2",
                        "Loaded: {name}"
                    }
                }

                if let Some(ref err) = error() {
                    p { class: "text-[var(--text-error)] mb-2",
                        "{err}"
                    }
                }

                p { class: "text-[var(--text-secondary)] mb-3",
                    "Drop an image here or "
                }

                label {
                    class: "inline-block px-4 py-2 bg-[var(--btn-primary)] hover:bg-[var(--btn-primary-hover)] rounded cursor-pointer text-white font-medium transition-colors",
                    input {
                        r#type: "file",
                        accept: ".png,.jpg,.jpeg,.bmp,.webp",
                        class: "hidden",
                        onchange: handle_files,
                    }
                    "Choose File"
                }

                p { class: "text-[var(--muted)] text-sm mt-2",
                    "PNG, JPEG, BMP, WebP"
                }
            }
        }
    }
}
