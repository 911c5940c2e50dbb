pub mod convert;
pub mod extract;

/// Upload formats the service accepts. Anything else is rejected before the
/// pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedFormat {
    Pdf,
    Ppt,
    Pptx,
}

impl SupportedFormat {
    /// Case-insensitive match on the filename extension.
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = std::path::Path::new(name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();

        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "ppt" => Some(Self::Ppt),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// PDF passes through untouched; slide decks go through the converter.
    pub fn needs_conversion(self) -> bool {
        matches!(self, Self::Ppt | Self::Pptx)
    }
}

#[cfg(test)]
pub mod test_pdf {
    //! Minimal hand-assembled PDFs for tests. Cross-reference offsets are
    //! computed while assembling, so the files are structurally valid.

    fn assemble(objects: &[String]) -> Vec<u8> {
        let mut body = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();

        for obj in objects {
            offsets.push(body.len());
            body.push_str(obj);
        }

        let xref_pos = body.len();
        body.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        body.push_str("0000000000 65535 f \n");
        for off in &offsets {
            body.push_str(&format!("{:010} 00000 n \n", off));
        }
        body.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_pos
        ));

        body.into_bytes()
    }

    /// A one-page PDF whose content stream draws nothing: parses cleanly,
    /// extracts to nothing.
    pub fn empty_page_pdf() -> Vec<u8> {
        assemble(&[
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string(),
            "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n".to_string(),
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << >> /Contents 4 0 R >>\nendobj\n"
                .to_string(),
            "4 0 obj\n<< /Length 0 >>\nstream\n\nendstream\nendobj\n".to_string(),
        ])
    }

    /// A one-page PDF whose single content stream draws `text` in Helvetica.
    pub fn single_text_pdf(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", text);
        assemble(&[
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string(),
            "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n".to_string(),
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>\nendobj\n"
                .to_string(),
            "4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n"
                .to_string(),
            format!(
                "5 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
                stream.len(),
                stream
            ),
        ])
    }
}
