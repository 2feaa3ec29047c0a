use crate::api::Error;

pub const MAX_IMAGES: usize = 5;
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
pub const MIN_TEXT_CHARS: usize = 20;
pub const DEFAULT_ITEM_COUNT: u32 = 10;
pub const MAX_ITEM_COUNT: u32 = 50;

const DOCUMENT_MIMES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// A file picked by the user, read into memory
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SourceTab {
    #[default]
    Text,
    Document,
    Image,
}

/// What a flashcard or quiz set gets generated from
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GenerationSource {
    Text(String),
    Document(Attachment),
    Images(Vec<Attachment>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenerationRequest {
    pub source: GenerationSource,
    pub item_count: u32,
}

/// State of the three-tab generation form
///
/// Only the active tab holds data: switching tabs resets the other two.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenerationInput {
    tab: SourceTab,
    text: String,
    document: Option<Attachment>,
    images: Vec<Attachment>,
    item_count: u32,
}

impl Default for GenerationInput {
    fn default() -> GenerationInput {
        GenerationInput {
            tab: SourceTab::default(),
            text: String::new(),
            document: None,
            images: Vec::new(),
            item_count: DEFAULT_ITEM_COUNT,
        }
    }
}

impl GenerationInput {
    pub fn tab(&self) -> SourceTab {
        self.tab
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn document(&self) -> Option<&Attachment> {
        self.document.as_ref()
    }

    pub fn images(&self) -> &[Attachment] {
        &self.images
    }

    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    pub fn switch_tab(&mut self, tab: SourceTab) {
        if tab == self.tab {
            return;
        }
        self.tab = tab;
        self.text.clear();
        self.document = None;
        self.images.clear();
    }

    pub fn set_text(&mut self, text: String) {
        self.switch_tab(SourceTab::Text);
        self.text = text;
    }

    pub fn set_item_count(&mut self, count: u32) {
        self.item_count = count.clamp(1, MAX_ITEM_COUNT);
    }

    pub fn set_document(&mut self, doc: Attachment) -> Result<(), Error> {
        if !DOCUMENT_MIMES.contains(&doc.mime.as_str()) {
            return Err(Error::Invalid(String::from(
                "Chỉ hỗ trợ tệp PDF, DOCX hoặc TXT",
            )));
        }
        check_size(&doc)?;
        self.switch_tab(SourceTab::Document);
        self.document = Some(doc);
        Ok(())
    }

    pub fn add_image(&mut self, image: Attachment) -> Result<(), Error> {
        if !image.mime.starts_with("image/") {
            return Err(Error::Invalid(String::from("Tệp không phải là hình ảnh")));
        }
        check_size(&image)?;
        self.switch_tab(SourceTab::Image);
        if self.images.len() >= MAX_IMAGES {
            return Err(Error::Invalid(format!(
                "Chỉ được tải lên tối đa {MAX_IMAGES} ảnh"
            )));
        }
        self.images.push(image);
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    /// Validates the active tab and builds the request to send
    pub fn request(&self) -> Result<GenerationRequest, Error> {
        let source = match self.tab {
            SourceTab::Text => {
                let text = self.text.trim();
                if text.chars().count() < MIN_TEXT_CHARS {
                    return Err(Error::Invalid(format!(
                        "Vui lòng nhập ít nhất {MIN_TEXT_CHARS} ký tự"
                    )));
                }
                GenerationSource::Text(String::from(text))
            }
            SourceTab::Document => GenerationSource::Document(
                self.document
                    .clone()
                    .ok_or_else(|| Error::Invalid(String::from("Vui lòng chọn tài liệu")))?,
            ),
            SourceTab::Image => {
                if self.images.is_empty() {
                    return Err(Error::Invalid(String::from("Vui lòng chọn ít nhất 1 ảnh")));
                }
                GenerationSource::Images(self.images.clone())
            }
        };
        Ok(GenerationRequest {
            source,
            item_count: self.item_count,
        })
    }
}

fn check_size(a: &Attachment) -> Result<(), Error> {
    if a.bytes.len() > MAX_FILE_BYTES {
        return Err(Error::Invalid(format!(
            "Tệp {} vượt quá 10MB",
            a.name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str) -> Attachment {
        Attachment {
            name: String::from(name),
            mime: String::from(mime),
            bytes: vec![0; 16],
        }
    }

    #[test]
    fn switching_tab_resets_siblings() {
        let mut w = GenerationInput::default();
        w.set_text(String::from("photosynthesis happens in chloroplasts"));
        w.add_image(file("a.png", "image/png")).unwrap();
        assert_eq!(w.tab(), SourceTab::Image);
        assert_eq!(w.text(), "");
        w.set_document(file("notes.pdf", "application/pdf")).unwrap();
        assert!(w.images().is_empty());
        w.switch_tab(SourceTab::Document);
        assert!(w.document().is_some());
    }

    #[test]
    fn request_validates_active_tab() {
        let mut w = GenerationInput::default();
        w.set_text(String::from("too short"));
        assert!(w.request().is_err());
        w.set_text(String::from("the mitochondria is the powerhouse of the cell"));
        w.set_item_count(500);
        let req = w.request().unwrap();
        assert_eq!(req.item_count, MAX_ITEM_COUNT);
        assert!(matches!(req.source, GenerationSource::Text(_)));

        w.switch_tab(SourceTab::Image);
        assert!(w.request().is_err());
    }

    #[test]
    fn rejects_wrong_files() {
        let mut w = GenerationInput::default();
        assert!(w.set_document(file("a.exe", "application/x-msdownload")).is_err());
        assert!(w.add_image(file("a.pdf", "application/pdf")).is_err());
        assert_eq!(w.tab(), SourceTab::Text);
        for i in 0..MAX_IMAGES {
            w.add_image(file(&format!("{i}.jpg"), "image/jpeg")).unwrap();
        }
        assert!(w.add_image(file("extra.jpg", "image/jpeg")).is_err());
        w.remove_image(0);
        assert_eq!(w.images().len(), MAX_IMAGES - 1);
    }
}
