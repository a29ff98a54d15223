// ドメイン層 - ビジネスロジックの中核

pub mod board;
pub mod search;
pub mod species;
pub mod stage;
pub mod team;
