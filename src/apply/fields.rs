use crate::error::HedError;
use crate::expr::{Field, SharedStr};
use crate::target::Subject;

/// Version history of every field for one evaluation of one subject.
///
/// Version 0 of a field is its intrinsic value and is pulled from the subject
/// on first access; later versions are appended by matched expressions.
#[derive(Debug, Default)]
pub(crate) struct FieldStore {
    versions: [Vec<SharedStr>; Field::COUNT],
}

impl FieldStore {
    fn initialized<S: Subject + ?Sized>(
        &mut self,
        field: Field,
        subject: &S,
    ) -> &mut Vec<SharedStr> {
        if self.versions[field.index()].is_empty() {
            let intrinsic = match field {
                Field::Group => self.latest(Field::Name, subject),
                other => SharedStr::from(subject.intrinsic(other)),
            };
            self.versions[field.index()].push(intrinsic);
        }
        &mut self.versions[field.index()]
    }

    /// Version `index` of `field`; negative indices count back from the
    /// latest version.
    pub(crate) fn get<S: Subject + ?Sized>(
        &mut self,
        field: Field,
        index: i8,
        subject: &S,
    ) -> Result<SharedStr, HedError> {
        let versions = self.initialized(field, subject);
        let position = resolve_index(field, index, versions.len())?;
        Ok(versions[position].clone())
    }

    pub(crate) fn latest<S: Subject + ?Sized>(&mut self, field: Field, subject: &S) -> SharedStr {
        let versions = self.initialized(field, subject);
        // Initialization guarantees one version.
        versions
            .last()
            .cloned()
            .unwrap_or_else(|| SharedStr::from(""))
    }

    pub(crate) fn push<S: Subject + ?Sized>(
        &mut self,
        field: Field,
        value: SharedStr,
        subject: &S,
    ) {
        self.initialized(field, subject).push(value);
    }

    /// Latest version of `field` if an expression ever wrote one.
    pub(crate) fn appended(&self, field: Field) -> Option<&SharedStr> {
        let versions = &self.versions[field.index()];
        if versions.len() > 1 {
            versions.last()
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self, field: Field) -> usize {
        self.versions[field.index()].len()
    }
}

fn resolve_index(field: Field, index: i8, len: usize) -> Result<usize, HedError> {
    let signed = i32::from(index);
    let resolved = if signed < 0 {
        len as i64 + i64::from(signed)
    } else {
        i64::from(signed)
    };
    if resolved < 0 || resolved >= len as i64 {
        return Err(HedError::FieldIndexOutOfRange {
            field,
            index: signed,
            len,
        });
    }
    Ok(resolved as usize)
}
