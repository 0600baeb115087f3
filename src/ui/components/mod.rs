pub mod answer_card;
pub mod drill_list;
pub mod drill_tabs;
pub mod input_field;
pub mod integration_card;
pub mod menu;
pub mod substitution_card;
pub mod toast;
pub mod word_picker;
