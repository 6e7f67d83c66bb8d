mod realtime_test;
