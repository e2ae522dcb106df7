pub mod category_bar;
pub mod slideshow;
pub mod story_detail;
pub mod story_list;
