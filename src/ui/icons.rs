pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const KEY: &str = "🔑";
    pub const DATABASE: &str = "🗄️";
    pub const NEW: &str = "✨";
}
