use slotmap::new_key_type;

new_key_type! {
    /// Identifies a device in a workshop.
    pub struct DeviceId;
}
