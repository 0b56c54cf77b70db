use intake_core::constants::{IMAGE_FIELD_NAME, TOKEN_FIELD_NAME};

const TEMPLATE: &str = include_str!("page.html");

/// Renders the upload page.
///
/// Values are embedded as JavaScript string literals, with `<` escaped so nothing in them
/// can close the surrounding `<script>` element. A trailing `/` on `images_url` is dropped.
pub fn render_landing_page(images_url: Option<&str>) -> String {
    let images_url = images_url.map(|url| url.trim_end_matches('/')).unwrap_or("");

    TEMPLATE
        .replace("__IMAGES_URL__", &js_string(images_url))
        .replace("__TOKEN_FIELD__", &js_string(TOKEN_FIELD_NAME))
        .replace("__IMAGE_FIELD__", &js_string(IMAGE_FIELD_NAME))
}

fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace('<', "\\u003c")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_embedded() {
        let page = render_landing_page(None);
        assert!(page.contains(r#"const TOKEN_FIELD = "totp_token";"#));
        assert!(page.contains(r#"const IMAGE_FIELD = "image";"#));
        assert!(page.contains(r#"const IMAGES_URL = "";"#));
        assert!(!page.contains("__"));
    }

    #[test]
    fn test_images_url_trailing_slash_trimmed() {
        let page = render_landing_page(Some("https://img.example.com/uploads/"));
        assert!(page.contains(r#"const IMAGES_URL = "https://img.example.com/uploads";"#));
    }

    #[test]
    fn test_images_url_cannot_break_out_of_script() {
        let page = render_landing_page(Some(r#"x"</script><script>alert(1)"#));
        assert!(!page.contains("</script><script>alert"));
        assert!(page.contains(r#"x\"\u003c/script>\u003cscript>alert(1)"#));
    }
}
