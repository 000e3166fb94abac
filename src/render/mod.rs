pub(crate) mod backend;
pub(crate) mod cpu;
pub(crate) mod pixel;
pub(crate) mod surface_pool;
