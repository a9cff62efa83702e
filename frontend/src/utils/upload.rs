use crate::api::Upload;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Checks a picked picture before it is sent.
pub fn check_image(upload: &Upload) -> Result<(), String> {
    if !upload.content_type.starts_with("image/") {
        return Err("Please choose an image file".into());
    }
    if upload.bytes.is_empty() {
        return Err("The selected file is empty".into());
    }
    if upload.bytes.len() > MAX_UPLOAD_BYTES {
        return Err("Images must be 5 MB or smaller".into());
    }
    Ok(())
}

/// Reads the first file of an `<input type="file">` into memory.
#[cfg(target_arch = "wasm32")]
pub async fn read_selected_file(input: &web_sys::HtmlInputElement) -> Result<Option<Upload>, String> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| "Could not read the selected file".to_string())?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(Some(Upload {
        file_name: file.name(),
        content_type: file.type_(),
        bytes,
    }))
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn read_selected_file(_input: &web_sys::HtmlInputElement) -> Result<Option<Upload>, String> {
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, len: usize) -> Upload {
        Upload {
            file_name: "pic.png".into(),
            content_type: content_type.into(),
            bytes: vec![1; len],
        }
    }

    #[test]
    fn check_image_accepts_small_images() {
        assert!(check_image(&upload("image/png", 10)).is_ok());
    }

    #[test]
    fn check_image_rejects_other_files() {
        assert!(check_image(&upload("application/pdf", 10)).is_err());
        assert!(check_image(&upload("image/png", 0)).is_err());
        assert!(check_image(&upload("image/jpeg", MAX_UPLOAD_BYTES + 1)).is_err());
    }
}
