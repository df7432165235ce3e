pub mod delve;
pub mod fs;
pub mod gopls;
pub mod terminal;
