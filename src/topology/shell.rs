use super::face::FaceId;

slotmap::new_key_type! {
    pub struct ShellId;
}

/// Faces sharing edges; a closed shell bounds a volume.
#[derive(Debug, Clone)]
pub struct ShellData {
    pub faces: Vec<FaceId>,
    pub is_closed: bool,
}
