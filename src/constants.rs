pub mod codes {

    pub const DEFAULT_LENGTH: usize = 6;

    pub const MIN_LENGTH: usize = 4;

    pub const MAX_LENGTH: usize = 10;
}

pub mod pass {

    pub const PREFIX: &str = "VIS";
}

pub mod limits {

    pub const DEFAULT_LIST_LIMIT: u64 = 100;

    pub const MAX_LIST_LIMIT: u64 = 1000;

    pub const MAX_REASON_LENGTH: usize = 500;

    pub const MIN_PASSWORD_LENGTH: usize = 8;
}
