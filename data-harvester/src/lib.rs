pub mod step1_load;
pub mod step2_enrich_time;
pub mod step3_label_trips;
pub mod step4_summarize;
pub mod trace_file;
