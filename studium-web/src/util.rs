use studium_client::Attachment;
use wasm_bindgen_futures::JsFuture;

/// Files currently picked in the `<input type="file">` an event comes from
pub fn picked_files(e: &web_sys::Event) -> Vec<web_sys::File> {
    use yew::TargetCast;
    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
    let files = match input.files() {
        Some(f) => f,
        None => return Vec::new(),
    };
    let res = (0..files.length()).filter_map(|i| files.get(i)).collect();
    // allow picking the same file again after it was removed
    input.set_value("");
    res
}

pub async fn read_file(file: web_sys::File) -> Option<Attachment> {
    match JsFuture::from(file.array_buffer()).await {
        Ok(buf) => Some(Attachment {
            name: file.name(),
            mime: file.type_(),
            bytes: js_sys::Uint8Array::new(&buf).to_vec(),
        }),
        Err(e) => {
            tracing::warn!(name = %file.name(), err = ?e, "failed reading picked file");
            None
        }
    }
}

pub async fn read_files(files: Vec<web_sys::File>) -> Vec<Attachment> {
    let mut res = Vec::with_capacity(files.len());
    for f in files {
        res.extend(read_file(f).await);
    }
    res
}

/// Blocking browser confirmation dialog
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub async fn sleep(d: std::time::Duration) {
    if let Err(e) = wasm_timer::Delay::new(d).await {
        tracing::warn!(err = %e, "timer failed");
    }
}
