use bytes::Bytes;

use crate::errors::FieldError;
use crate::models::candidate::NewCandidate;

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_CHARS: usize = 10;
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Raw text fields as they arrive from the intake form.
#[derive(Debug, Clone, Default)]
pub struct CandidateForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
}

/// One file part named `resume`.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeUpload {
    /// Browsers send an empty, unnamed part when no file was chosen.
    pub fn is_placeholder(&self) -> bool {
        self.file_name.trim().is_empty() && self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    pub fields: CandidateForm,
    pub resumes: Vec<ResumeUpload>,
    /// The request body hit the size limit; parts after that point were not read.
    pub resume_too_large: bool,
}

/// Output of a successful validation. `candidate.resume_url` is unset until the file is stored.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub candidate: NewCandidate,
    pub resume: Option<ResumeUpload>,
}

/// Validates every field and collects one error per failing field.
///
/// Normalization: name, phone and job title are trimmed; email is trimmed and lowercased.
pub fn validate_submission(
    form: IntakeForm,
    max_resume_bytes: usize,
) -> Result<ValidatedSubmission, Vec<FieldError>> {
    let mut errors = Vec::new();
    let IntakeForm {
        fields,
        resumes,
        resume_too_large,
    } = form;

    let name = trimmed(fields.name);
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if name.chars().count() < MIN_NAME_CHARS {
        errors.push(FieldError::new(
            "name",
            format!("Name must be at least {MIN_NAME_CHARS} characters"),
        ));
    }

    let email = trimmed(fields.email).to_lowercase();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Invalid email format"));
    }

    let phone = trimmed(fields.phone);
    if phone.is_empty() {
        errors.push(FieldError::new("phone", "Phone is required"));
    } else if phone.chars().count() < MIN_PHONE_CHARS {
        errors.push(FieldError::new(
            "phone",
            format!("Phone must be at least {MIN_PHONE_CHARS} digits"),
        ));
    }

    let job_title = trimmed(fields.job_title);
    if job_title.is_empty() {
        errors.push(FieldError::new("jobTitle", "Job title is required"));
    }

    let mut resumes: Vec<ResumeUpload> = resumes
        .into_iter()
        .filter(|r| !r.is_placeholder())
        .collect();
    let resume = match resumes.len() {
        _ if resume_too_large => {
            errors.push(FieldError::new(
                "resume",
                resume_too_large_message(max_resume_bytes),
            ));
            None
        }
        0 => None,
        1 => {
            let upload = resumes.remove(0);
            match check_resume(&upload, max_resume_bytes) {
                Some(message) => {
                    errors.push(FieldError::new("resume", message));
                    None
                }
                None => Some(upload),
            }
        }
        _ => {
            errors.push(FieldError::new(
                "resume",
                "Only one resume file may be uploaded",
            ));
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedSubmission {
        candidate: NewCandidate {
            name,
            email,
            phone,
            job_title,
            resume_url: None,
        },
        resume,
    })
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Returns the failure message for an unacceptable résumé.
fn check_resume(upload: &ResumeUpload, max_bytes: usize) -> Option<String> {
    if !is_pdf(upload) {
        return Some("Only PDF files allowed".to_string());
    }
    if upload.bytes.is_empty() {
        return Some("Resume file is empty".to_string());
    }
    if upload.bytes.len() > max_bytes {
        return Some(resume_too_large_message(max_bytes));
    }
    None
}

pub fn resume_too_large_message(max_bytes: usize) -> String {
    format!("Resume must be {} or smaller", format_size(max_bytes))
}

fn format_size(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    const KB: usize = 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{} KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Accepts a declared `application/pdf`. A missing or generic declared type
/// falls back to the `.pdf` extension.
fn is_pdf(upload: &ResumeUpload) -> bool {
    let declared = upload
        .content_type
        .as_deref()
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match declared.as_deref() {
        Some(PDF_CONTENT_TYPE) => true,
        None | Some("") | Some("application/octet-stream") => upload
            .file_name
            .to_ascii_lowercase()
            .trim()
            .ends_with(".pdf"),
        Some(_) => false,
    }
}

/// Mirrors `^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$` with non-empty domain labels.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'));
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld = labels[labels.len() - 1];

    labels_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
