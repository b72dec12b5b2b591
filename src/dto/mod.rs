pub mod builder_dto;
pub mod response_dto;
pub mod template_dto;
