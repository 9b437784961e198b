pub mod scene_desc;
