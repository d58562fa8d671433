use crate::refs::{ObjectReferences, RefType};
use chrono::{DateTime, Datelike, Local, Offset, Timelike};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// Metadata written into the PDF information dictionary of a label sheet
#[derive(Debug, Clone)]
pub struct Info {
    pub title: String,
    pub subject: Option<String>,
    pub created: DateTime<Local>,
}

impl Info {
    pub fn new<S: ToString>(title: S) -> Info {
        Info {
            title: title.to_string(),
            subject: None,
            created: Local::now(),
        }
    }

    /// Describe a batch of `labels` labels laid out with the named page policy
    pub fn for_batch(policy: &str, labels: usize) -> Info {
        let mut info = Info::new("Price labels");
        info.subject = Some(format!("{labels} label(s), {policy} layout"));
        info
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        info.title(TextStr(self.title.as_str()));
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));
        info.creation_date(pdf_date(&self.created));
    }
}

fn pdf_date(at: &DateTime<Local>) -> PDate {
    let offset_seconds = at.offset().fix().local_minus_utc();
    let offset_hours = offset_seconds / 3600;
    let offset_minutes = ((offset_seconds % 3600) / 60).abs();
    PDate::new(at.year() as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
        .utc_offset_hour(offset_hours as i8)
        .utc_offset_minute(offset_minutes as u8)
}
