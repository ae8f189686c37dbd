mod db_info_decoding;
